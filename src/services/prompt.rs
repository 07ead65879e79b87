//! 提示词构建 - 纯函数，无副作用

/// 任务说明
pub const PROMPT_BASE: &str = "Given the following extracted text from a pdf document that describes a product return a json object that represents the product.";

/// 目标 JSON 的 schema 描述（原样嵌入提示词）
pub const PROMPT_JSON_SCHEMA: &str = r#"
The json object should have the following schema:
{
  "name": "string",
  "anwendungs_gebiete": ["string1", "string2", "..."],
  "vorteile": ["string1", "string2", "..."],
  "eigenschaften": ["string1", "string2", "..."],
  "nenn_strom_a": 0,
  "strom_steuer_a_min": 0,
  "strom_steuer_a_max": 0,
  "nenn_leistung_w": 0,
  "nenn_spannung_v": 0,
  "durchmesser_mm": 0,
  "laenge_mm": 0,
  "laenge_mit_sockel_mm": 0,
  "lcl_mm": 0,
  "kabel_laenge_mm": 0,
  "elekroden_abstand_mm": 0,
  "produkt_gewicht_g": 0,
  "max_umgebungsgtemperatur_c": 0,
  "lebensdauer_h": 0,
  "sockel_anode": "string",
  "sockel_kathode": "string",
  "kuehlung": "string",
  "brennstellung": "string",
  "deklarations_datum": "YYYY-MM-DD",
  "erzeugniss_nummern": ["string1", "string2", "..."],
  "stoff": "string",
  "stoff_cas_nummer": "string",
  "scip_nummern": ["string1", "string2", "..."],
  "ean": "string",
  "metel_code": "string",
  "seg_no": "string",
  "stk_nummer": "string",
  "uk_org": "string"
}
"#;

/// 构建发送给 LLM 的用户消息
///
/// 任务说明 + 提取出的 PDF 文本 + schema。输入可以为空。
pub fn build_prompt(pdf_text: &str) -> String {
    format!(
        "{}\nextracted text:\n{}\n{}",
        PROMPT_BASE, pdf_text, PROMPT_JSON_SCHEMA
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::{FieldKind, PRODUCT_FIELDS};

    #[test]
    fn test_prompt_is_deterministic() {
        let text = "XK-100 Lamp, 40W, 12V";
        assert_eq!(build_prompt(text), build_prompt(text));
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = build_prompt("XK-100 Lamp, 40W, 12V");
        assert!(prompt.starts_with(PROMPT_BASE));
        assert!(prompt.contains("\nextracted text:\nXK-100 Lamp, 40W, 12V\n"));
        assert!(prompt.ends_with(PROMPT_JSON_SCHEMA));
    }

    #[test]
    fn test_only_embedded_text_differs() {
        let a = build_prompt("Lampe A");
        let b = build_prompt("Lampe B, 2000W");
        let prefix = format!("{}\nextracted text:\n", PROMPT_BASE);
        let suffix = format!("\n{}", PROMPT_JSON_SCHEMA);

        assert_ne!(a, b);
        for p in [&a, &b] {
            assert!(p.starts_with(&prefix));
            assert!(p.ends_with(&suffix));
        }
        assert_eq!(&a[prefix.len()..a.len() - suffix.len()], "Lampe A");
        assert_eq!(&b[prefix.len()..b.len() - suffix.len()], "Lampe B, 2000W");
    }

    #[test]
    fn test_empty_text_allowed() {
        let prompt = build_prompt("");
        assert!(prompt.contains("extracted text:\n\n"));
    }

    #[test]
    fn test_schema_lists_every_field() {
        for (name, kind) in PRODUCT_FIELDS {
            let expected = match kind {
                FieldKind::Text => format!("\"{}\": \"string\"", name),
                FieldKind::Number => format!("\"{}\": 0", name),
                FieldKind::TextList => format!("\"{}\": [\"string1\", \"string2\", \"...\"]", name),
                FieldKind::Date => format!("\"{}\": \"YYYY-MM-DD\"", name),
            };
            assert!(
                PROMPT_JSON_SCHEMA.contains(&expected),
                "schema 缺少字段: {}",
                expected
            );
        }
    }
}
