//! Terminal host for the registration form.
//!
//! Mounts one registration workflow per invocation. A draft is read from a JSON file keyed
//! by field name and replayed into the workflow as edit events, exactly as if it had been
//! typed into the form.
//!
//! # Environment Variables
//! - `ADMISSIONS_WEBHOOK_URL`: endpoint submissions are posted to (overridden by `--endpoint`)
//! - `ADMISSIONS_SCHOOL_YEAR`: academic year tag (default: "2025-2026")
//! - `ADMISSIONS_TIMEOUT_SECS`: request timeout in seconds (default: 30)

use admissions_core::{
    config::{
        request_timeout_from_env_value, school_year_from_env_value, webhook_url_from_env_value,
    },
    constants::{REQUEST_TIMEOUT_ENV, SCHOOL_YEAR_ENV, WEBHOOK_URL_ENV},
    validation::first_missing_field,
    Catalogue, CoreConfig, Draft, FieldId, FieldKind, HttpTransport, MessageKey, NoticeKind,
    RegistrationWorkflow, Submitter, TextLookup, TypedSignature, WorkflowError,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "admissions")]
#[command(about = "Student registration form for the admissions office")]
struct Cli {
    /// Text catalogue (JSON object of key to text) overlaid on the English strings
    #[arg(long, global = true)]
    lang: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the form's fields and labels
    Fields,
    /// Check a draft file without submitting it
    Validate {
        /// Draft JSON file
        draft: PathBuf,
    },
    /// Submit a draft file to the registration webhook
    Submit {
        /// Draft JSON file
        draft: PathBuf,
        /// Webhook endpoint (defaults to ADMISSIONS_WEBHOOK_URL)
        #[arg(long)]
        endpoint: Option<String>,
        /// Accept the enrolment terms
        #[arg(long)]
        accept_terms: bool,
        /// Sign as this parent/guardian (typed signature)
        #[arg(long)]
        sign_as: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("admissions=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let catalogue = load_catalogue(cli.lang.as_deref())?;

    match cli.command {
        Some(Commands::Fields) => {
            print!("{}", render_fields(&catalogue));
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Validate { draft }) => {
            let draft = load_draft(&draft)?;
            match admissions_core::validate(&draft) {
                Ok(()) => {
                    println!("OK");
                    Ok(ExitCode::SUCCESS)
                }
                Err(reason) => {
                    if let Some(field) = first_missing_field(&draft) {
                        tracing::debug!("first missing field: {}", field);
                    }
                    let notice: NoticeKind = reason.into();
                    eprintln!("{}", catalogue.message(notice.message_key()));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Some(Commands::Submit {
            draft,
            endpoint,
            accept_terms,
            sign_as,
        }) => {
            let cfg = resolve_config(endpoint)?;
            let draft = load_draft(&draft)?;
            submit(cfg, catalogue, &draft, accept_terms, sign_as).await
        }
        None => {
            println!("Use 'admissions --help' for commands");
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn submit(
    cfg: CoreConfig,
    catalogue: Catalogue,
    draft: &Draft,
    accept_terms: bool,
    sign_as: Option<String>,
) -> anyhow::Result<ExitCode> {
    let transport = HttpTransport::new(&cfg)?;
    let workflow = RegistrationWorkflow::new(Submitter::new(cfg, transport), Arc::new(catalogue));

    for (field, value) in draft.iter().filter(|(_, v)| !v.is_empty()) {
        workflow.edit(field, value)?;
    }
    if let Some(name) = sign_as {
        workflow.capture_signature(&TypedSignature::new(name))?;
    }
    if accept_terms {
        workflow.accept_terms();
    }

    println!("{}", workflow.message(MessageKey::Submitting));
    match workflow.submit().await {
        Ok(_) => {
            println!("{}", workflow.message(MessageKey::SubmitOk));
            println!("{}", workflow.message(MessageKey::SubmitDiscus));
            Ok(ExitCode::SUCCESS)
        }
        Err(WorkflowError::TermsNotAccepted) => {
            eprintln!("* {}", workflow.message(MessageKey::AcceptTerms));
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            tracing::debug!("submission not completed: {}", e);
            let message = workflow.error_message().unwrap_or_else(|| e.to_string());
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn resolve_config(endpoint: Option<String>) -> anyhow::Result<CoreConfig> {
    let endpoint = endpoint.or_else(|| std::env::var(WEBHOOK_URL_ENV).ok());
    let url = webhook_url_from_env_value(endpoint)?;
    let school_year = school_year_from_env_value(std::env::var(SCHOOL_YEAR_ENV).ok())?;
    let timeout = request_timeout_from_env_value(std::env::var(REQUEST_TIMEOUT_ENV).ok())?;

    Ok(CoreConfig::new(url, school_year, timeout)?)
}

fn load_catalogue(path: Option<&Path>) -> anyhow::Result<Catalogue> {
    match path {
        Some(path) => Ok(Catalogue::from_json_file(path)?),
        None => Ok(Catalogue::english()),
    }
}

fn load_draft(path: &Path) -> anyhow::Result<Draft> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read draft {}: {e}", path.display()))?;
    Ok(Draft::from_json_str(&text)?)
}

fn render_fields(text: &dyn TextLookup) -> String {
    let mut out = format!("{}\n", text.text(MessageKey::RegistrationForm.key()));
    for field in FieldId::ALL {
        if field == FieldId::MedicalMedication {
            out.push_str(&format!("\n{}\n", text.text(MessageKey::MedicalHistory.key())));
        }

        let marker = if field.is_required() { " *" } else { "" };
        out.push_str(&format!("  {:<20} {}{}", field.key(), text.text(field.key()), marker));
        match field.kind() {
            FieldKind::YesNo => out.push_str(&format!(
                " [{} | {}]",
                text.text(MessageKey::Yes.key()),
                text.text(MessageKey::No.key())
            )),
            FieldKind::Text if field == FieldId::MedicalConsent => out.push_str(&format!(
                " ({})",
                text.text(MessageKey::MedicalConsentPlaceholder.key())
            )),
            _ => {}
        }
        out.push('\n');
    }
    out.push_str(&format!("\n* {}\n", text.text(MessageKey::RequiredFields.key())));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_submit_flags() {
        let cli = Cli::try_parse_from([
            "admissions",
            "submit",
            "draft.json",
            "--endpoint",
            "http://127.0.0.1:8080/hook",
            "--accept-terms",
            "--sign-as",
            "Jane Doe",
        ])
        .expect("valid args");
        match cli.command {
            Some(Commands::Submit {
                draft,
                endpoint,
                accept_terms,
                sign_as,
            }) => {
                assert_eq!(draft, PathBuf::from("draft.json"));
                assert_eq!(endpoint.as_deref(), Some("http://127.0.0.1:8080/hook"));
                assert!(accept_terms);
                assert_eq!(sign_as.as_deref(), Some("Jane Doe"));
            }
            _ => panic!("expected submit command"),
        }
    }

    #[test]
    fn loads_draft_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"studentFirstName": "Amina", "speaksEnglish": "yes"}}"#)
            .expect("write");
        let draft = load_draft(file.path()).expect("load");
        assert_eq!(draft.get(FieldId::StudentFirstName), "Amina");
        assert_eq!(draft.get(FieldId::SpeaksEnglish), "yes");
    }

    #[test]
    fn missing_draft_file_is_reported_with_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nope.json");
        let err = load_draft(&path).expect_err("missing file");
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn field_listing_marks_required_fields() {
        let listing = render_fields(&Catalogue::english());
        assert!(listing.contains("studentFirstName     Student's First Name *"));
        assert!(listing.contains("motherName           Mother's Name\n"));
        assert!(listing.contains("Student's Medical History"));
        assert!(listing.contains("(Parent/Guardian initials)"));
        assert!(listing.contains("[Yes | No]"));
    }

    #[test]
    fn explicit_endpoint_wins() {
        let cfg = resolve_config(Some("https://hooks.example.org/a".into())).expect("config");
        assert_eq!(cfg.webhook_url().as_str(), "https://hooks.example.org/a");
    }
}
