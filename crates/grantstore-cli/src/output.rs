use anyhow::Result;
use colored::Colorize;
use grantstore::PersistedGrant;
use tabled::builder::Builder;
use tabled::settings::Style;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::cli::OutputFormat;

pub fn print_grants(grants: &[PersistedGrant], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(grants)?);
        }
        OutputFormat::Table => print_as_table(grants),
    }
    Ok(())
}

pub fn print_grant(grant: &PersistedGrant, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(grant)?);
        }
        OutputFormat::Table => print_as_table(std::slice::from_ref(grant)),
    }
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn print_as_table(grants: &[PersistedGrant]) {
    if grants.is_empty() {
        println!("No grants found.");
        return;
    }

    let now = OffsetDateTime::now_utc();
    let mut builder = Builder::default();
    builder.push_record(["Key", "Type", "Subject", "Client", "Created", "Expires"]);
    for grant in grants {
        let expires = match grant.expiration {
            Some(exp) if grant.is_expired_at(now) => format!("{} (expired)", timestamp(exp)),
            Some(exp) => timestamp(exp),
            None => "-".to_string(),
        };
        builder.push_record([
            grant.key.clone(),
            grant.grant_type.clone(),
            grant.subject_id.clone(),
            grant.client_id.clone(),
            timestamp(grant.creation_time),
            expires,
        ]);
    }
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
    println!("Total: {}", grants.len());
}

fn timestamp(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_else(|_| value.to_string())
}
