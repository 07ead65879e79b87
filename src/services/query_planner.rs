//! 问题转查询 - 业务能力层
//!
//! 把用户的自然语言问题交给 LLM（JSON 模式），得到 [`Query`] 对象。
//! 执行查询需要数据库，不在本模块内。

use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::models::Query;
use crate::services::llm_service::CompletionClient;
use crate::utils::logging::truncate_text;

/// 问题转查询的系统提示词
pub const QUERY_SYSTEM_PROMPT: &str = r#"
You are a helpful assistent that maps a user querstion to a database query.
The api accepts a json object with the following structure:
{
  "query": {
    "type": "many" | "one",
    "where": [
      {
        "field": string,
        "value": float | string,
        "op": "eq" | "gte" | "lte" | "gt" | "lt"
      }
    ],
    "return_fields": [string]
  }
}
You can choose between the following fields of a bulb products within the db.
name VARCHAR,
 anwendungs_gebiete JSONB,
 -- list of strings
 vorteile JSONB,
 -- list of strings
 eigenschaften JSONB,
 -- list of strings
 nenn_strom_a REAL,
 -- in Ampere
 strom_steuer_a_min REAL,
 -- in Ampere
 stroem_steuer_a_max REAL,
 -- in Ampere
 nenn_leistung_w REAL,
 -- in Watt
 nenn_spannung_v REAL,
 -- in Volt
 durchmesser_mm REAL,
 -- in mm
 laenge_mm REAL,
 -- in mm
 laenge_mit_sockel_mm REAL,
 -- Länge mit Sockel jedoch ohne Sockelstift
 lcl_mm REAL,
 -- Abstand Lichtschwerpunkt (LCL)
 kabel_laenge_mm REAL,
 -- Kabel-/Leitungslänge, Eingangsseite
 elekroden_abstand_mm REAL,
 -- Elektrodenabstand kalt
 produkt_gewicht_g REAL,
 -- in Gramm
 max_umgebungsgtemperatur_c REAL,
 -- in Grad Celsius
 lebensdauer_h REAL,
 -- in Stunden
 sockel_anode VARCHAR,
 -- Socker Anode (Normbezeichnung)
 sockel_kathode VARCHAR,
 -- Sockel Kathode (Normbezeichnung)
 kuehlung VARCHAR,
 -- Kühlung enum
 brennstellung VARCHAR,
 -- Brennstellung
 deklarations_datum DATE,
 -- Datum der Deklaration
 erzeugniss_nummern JSONB,
 -- Primäre Erzeugnisnummer, can be multiple split by |
 stoff VARCHAR,
 -- Stoff der Kandidatenliste
 stoff_cas_nummer VARCHAR,
 -- CAS-Nummer des Stoffes
 scip_nummern JSONB,
 -- SCIP Deklarationsnummer, can be multiple split by |
 ean VARCHAR,
 -- EAN
 metel_code VARCHAR,
 -- METEL-Code
 seg_no VARCHAR,
 -- SEG-No.
 stk_nummer VARCHAR,
 -- STK-Nummer
 uk_org VARCHAR,
 -- UK-Org.

 Make sure to always include the field "name" in the return_fields.
"#;

/// 用户消息
pub fn question_message(question: &str) -> String {
    format!("User question: {}", question)
}

/// 把问题翻译成查询对象，并确认它能生成合法的 SQL
pub async fn question_to_query<C: CompletionClient>(client: &C, question: &str) -> Result<Query> {
    let content = client
        .complete_json(QUERY_SYSTEM_PROMPT, &question_message(question))
        .await
        .map_err(ExtractError::QueryPlanning)?
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| ExtractError::InvalidQuery("LLM 没有返回查询".to_string()))?;

    debug!("查询响应: {}", truncate_text(&content, 200));

    let query = Query::from_reply(&content)?;
    query.build()?;
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::models::{Operation, QueryType};
    use std::sync::Mutex;

    struct CannedClient {
        reply: Option<String>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl CannedClient {
        fn new(reply: Option<&str>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionClient for CannedClient {
        async fn complete_json(
            &self,
            system_message: &str,
            user_message: &str,
        ) -> std::result::Result<Option<String>, LlmError> {
            self.seen
                .lock()
                .unwrap()
                .push((system_message.to_string(), user_message.to_string()));
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn test_question_to_query() {
        let client = CannedClient::new(Some(
            r#"{"query": {"type": "many", "where": [{"field": "nenn_leistung_w", "value": 1500, "op": "gte"}, {"field": "lebensdauer_h", "value": 3000, "op": "gt"}], "return_fields": ["name", "lebensdauer_h"]}}"#,
        ));
        let question = "Gebe mir alle Leuchtmittel mit mindestens 1500W und einer Lebensdauer von mehr als 3000 Stunden?";

        let query = tokio_test::block_on(question_to_query(&client, question)).unwrap();
        assert_eq!(query.query_type, QueryType::Many);
        assert_eq!(query.conditions.len(), 2);
        assert_eq!(query.conditions[0].op, Operation::Gte);

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, QUERY_SYSTEM_PROMPT);
        assert_eq!(seen[0].1, format!("User question: {}", question));
    }

    #[test]
    fn test_empty_reply_is_invalid_query() {
        let client = CannedClient::new(Some("  "));
        assert!(matches!(
            tokio_test::block_on(question_to_query(&client, "Welche Lampe?")),
            Err(ExtractError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_unknown_field_in_reply_is_rejected() {
        let client = CannedClient::new(Some(
            r#"{"query": {"type": "one", "where": [{"field": "farbe", "value": "rot", "op": "eq"}], "return_fields": ["name"]}}"#,
        ));
        assert!(matches!(
            tokio_test::block_on(question_to_query(&client, "Welche Lampe ist rot?")),
            Err(ExtractError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_prompt_lists_every_column() {
        for column in crate::models::product_row::product_columns() {
            assert!(
                QUERY_SYSTEM_PROMPT.contains(&format!("{} ", column)),
                "提示词缺少列 {}",
                column
            );
        }
    }
}
