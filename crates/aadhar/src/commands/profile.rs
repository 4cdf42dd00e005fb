//! Profile handler.

use aadhar_api::{AadharClient, Profile};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn detail(p: &Profile) -> String {
    [
        format!("ID:       {}", p.id),
        format!("Username: {}", p.user_name),
        format!("Email:    {}", p.email),
        format!("Aadhar:   {}", p.display_aadhar()),
    ]
    .join("\n")
}

pub async fn handle(client: &AadharClient, global: &GlobalOpts) -> Result<(), CliError> {
    let profile = client.profile().await?;
    let out = output::render_single(&global.output, &profile, detail, |p| {
        p.user_name.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
