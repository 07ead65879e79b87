use anyhow::Result;
use datasheet_extract::utils::logging;
use datasheet_extract::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let _summary = App::initialize(config)?.run().await?;

    Ok(())
}
