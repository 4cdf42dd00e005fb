//! Record listing handler.

use tabled::Tabled;

use aadhar_api::{AadharClient, PageQuery, UserRecord};

use crate::cli::{DataArgs, GlobalOpts, OutputFormat};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Username")]
    user_name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Aadhar")]
    aadhar: String,
}

impl From<&UserRecord> for RecordRow {
    fn from(r: &UserRecord) -> Self {
        Self {
            id: r.id,
            user_name: r.user_name.clone(),
            email: r.email.clone(),
            aadhar: r.aadhar.to_string(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &AadharClient,
    args: &DataArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let page_size = args.page_size.unwrap_or(cfg.page_size);
    let raw = args.raw || !args.decrypted;
    let query = PageQuery::new(args.page.saturating_sub(1), page_size, raw);

    let page = client.get_data(&query).await?;

    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => output::render_list(
            &global.output,
            &page.data,
            |r| RecordRow::from(r),
            |r| r.id.to_string(),
        ),
        // Structured formats keep `total` alongside the rows.
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            output::render_single(&global.output, &page, |_| String::new(), |_| String::new())
        }
    };
    output::print_output(&out, global.quiet);

    if matches!(global.output, OutputFormat::Table) {
        output::print_output(
            &format!(
                "Page {} of {} ({} records)",
                args.page,
                page.page_count(page_size),
                page.total
            ),
            global.quiet,
        );
    }
    Ok(())
}
