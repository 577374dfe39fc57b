use anyhow::Result;
use footprint_client::domain::CalculationRow;
use seed_service::{
    config::AppConfig,
    observability,
    pipeline::Pipeline,
    sinks::{ScriptHeader, SqlScriptSink},
    sources::StudentYearSource,
    transform,
};
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;
    let gen_cfg = &cfg.generator;
    let start_date = gen_cfg.start_date()?;

    tracing::info!(
        user_id = %gen_cfg.user_id,
        %start_date,
        target_records = gen_cfg.target_records,
        seeded = gen_cfg.seed.is_some(),
        "generating synthetic student footprint script"
    );

    let source = StudentYearSource::new(
        gen_cfg.user_id,
        start_date,
        gen_cfg.target_records,
        &gen_cfg.country,
        gen_cfg.seed,
    )?;

    let sink = SqlScriptSink::new(
        tokio::io::stdout(),
        ScriptHeader {
            user_id: gen_cfg.user_id,
            student_name: gen_cfg.student_name.clone(),
            start_date,
            target_records: gen_cfg.target_records,
        },
        cfg.sink.batch_size,
        cfg.sink.progress_interval,
    );

    let pipeline: Pipeline<_, CalculationRow, _> = Pipeline {
        source,
        transforms: vec![Arc::new(transform::CalculationValidation)],
        sink,
    };

    pipeline.run().await?;

    Ok(())
}
