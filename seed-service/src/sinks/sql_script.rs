use footprint_client::domain::{CalculationRow, STUDENT_CAREER};
use futures::StreamExt;
use time::{macros::format_description, Date, Month};
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::Mutex,
};
use uuid::Uuid;

use crate::pipeline::{Envelope, PipelineError, Sink};

const RULE: &str = "-- ============================================================================";

/// Append `s` as a single-quoted SQL literal, doubling embedded quotes.
fn sql_quote(s: &str, out: &mut String) {
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
}

pub trait SqlEncode {
    fn write_sql_insert(&self, out: &mut String) -> Result<(), PipelineError>;
}

impl SqlEncode for CalculationRow {
    fn write_sql_insert(&self, out: &mut String) -> Result<(), PipelineError> {
        let input_json = self.input.to_json()?;
        let created_at = self
            .created_at
            .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))?;

        out.push_str(
            "INSERT INTO calculation (id, user_id, category, input_json, result_kg_co2e, factor_hash, created_at)\n",
        );
        out.push_str("VALUES (");
        sql_quote(&self.id.to_string(), out);
        out.push_str(", ");
        sql_quote(&self.user_id.to_string(), out);
        out.push_str(", ");
        sql_quote(self.category().as_str(), out);
        out.push_str(", ");
        sql_quote(&input_json, out);
        out.push_str("::jsonb, ");
        out.push_str(&self.result_kg_co2e.to_string());
        out.push_str(", ");
        sql_quote(&self.factor_hash, out);
        out.push_str(", ");
        sql_quote(&created_at, out);
        out.push_str(");");
        Ok(())
    }
}

/// Values quoted in the script's comment header.
#[derive(Debug, Clone)]
pub struct ScriptHeader {
    pub user_id: Uuid,
    pub student_name: Option<String>,
    pub start_date: Date,
    pub target_records: usize,
}

impl ScriptHeader {
    /// Twelve months from the start month, e.g. `December 2023 - November 2024`.
    fn span(&self) -> String {
        let start = self.start_date.month();
        let end = start.previous();
        let end_year = if start == Month::January {
            self.start_date.year()
        } else {
            self.start_date.year() + 1
        };
        format!("{start} {} - {end} {end_year}", self.start_date.year())
    }

    fn write(&self, out: &mut String) {
        out.push_str(RULE);
        out.push('\n');
        out.push_str("-- Synthetic carbon-footprint activity for one university student\n");
        if let Some(name) = &self.student_name {
            out.push_str(&format!("-- Student: {name}\n"));
        }
        out.push_str(&format!("-- User: {}\n", self.user_id));
        out.push_str(&format!("-- Career: {STUDENT_CAREER}\n"));
        out.push_str(&format!(
            "-- Period: full academic year ({}), starting {}\n",
            self.span(),
            self.start_date
        ));
        out.push_str(&format!("-- Total records: {}\n", self.target_records));
        out.push_str(RULE);
        out.push_str("\n\nBEGIN;\n\n");
    }
}

/// Writes rows as one transaction-wrapped SQL script.
pub struct SqlScriptSink<W> {
    writer: Mutex<W>,
    header: ScriptHeader,
    batch_size: usize,
    progress_interval: usize,
}

impl<W> SqlScriptSink<W> {
    pub fn new(writer: W, header: ScriptHeader, batch_size: usize, progress_interval: usize) -> Self {
        Self {
            writer: Mutex::new(writer),
            header,
            batch_size: batch_size.max(1),
            progress_interval: progress_interval.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

async fn write_chunk<W>(writer: &mut W, chunk: &str) -> Result<(), PipelineError>
where
    W: AsyncWrite + Unpin + Send,
{
    writer.write_all(chunk.as_bytes()).await?;
    metrics::counter!("seed_sql_bytes_total").increment(chunk.len() as u64);
    Ok(())
}

#[async_trait::async_trait]
impl<T, W> Sink<T> for SqlScriptSink<W>
where
    T: SqlEncode + Send + Sync + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn run<S>(&self, mut input: S) -> Result<(), PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<T>, PipelineError>> + Send + Unpin + 'static,
    {
        let mut writer = self.writer.lock().await;
        let target = self.header.target_records;

        let mut buffer = String::with_capacity(self.batch_size.saturating_mul(512));
        self.header.write(&mut buffer);

        let mut written: usize = 0;
        let mut buffered_rows: usize = 0;

        while let Some(item) = input.next().await {
            let env = match item {
                Ok(env) => env,
                Err(e) => {
                    tracing::warn!(error = %e, "dropping row rejected upstream of SqlScriptSink");
                    continue;
                }
            };

            env.payload.write_sql_insert(&mut buffer)?;
            buffer.push('\n');
            written += 1;
            buffered_rows += 1;

            if written % self.progress_interval == 0 {
                buffer.push_str(&format!("\n-- Progress: {written}/{target} records generated\n\n"));
            }

            if buffered_rows >= self.batch_size {
                write_chunk(&mut *writer, &buffer).await?;
                metrics::counter!("seed_rows_written_total").increment(buffered_rows as u64);
                tracing::debug!(rows = buffered_rows, written, "flushed SQL batch");
                buffer.clear();
                buffered_rows = 0;
            }
        }

        buffer.push_str("\nCOMMIT;\n\n");
        buffer.push_str(&format!("-- Total records generated: {written}\n"));
        buffer.push_str("-- Script generated successfully\n");
        write_chunk(&mut *writer, &buffer).await?;
        metrics::counter!("seed_rows_written_total").increment(buffered_rows as u64);

        writer.flush().await?;

        if written != target {
            tracing::warn!(written, target, "SQL script row count differs from target");
        }
        tracing::info!(written, "SQL script written");

        Ok(())
    }
}
