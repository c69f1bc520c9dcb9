//! translate-json - preview how a response body would look after translation
//!
//! Usage:
//!   cargo run --bin translate-json -- response.json --lang es
//!   cargo run --bin translate-json -- response.json --lang fr --fields message,items.*.title
//!   cargo run --bin translate-json -- response.json --lang de --replace
//!   cargo run --bin translate-json -- notice.txt --lang ja --mock
//!
//! Options:
//!   --lang <code>             Target language (defaults to DEFAULT_TARGET_LANGUAGE)
//!   --fields <a,b,...>        Field specifiers (defaults to TRANSLATE_FIELDS)
//!   --replace                 Overwrite source fields instead of preserving them
//!   --response-field <path>   Root for preserved translations (defaults to TRANSLATE_RESPONSE_FIELD)
//!   --detect                  Detect each field's source language first
//!   --mock                    Use the offline mock provider instead of Gemini
//!
//! Required environment variables (unless --mock):
//! - GEMINI_API_KEY

use anyhow::{bail, Context, Result};
use response_translator::config::{parse_list, Config};
use response_translator::formatter::ResponseFormatter;
use response_translator::gemini::GeminiProvider;
use response_translator::middleware::Payload;
use response_translator::mock::{MockMode, MockProvider};
use response_translator::orchestrator::{ApplyOptions, TranslationOrchestrator};
use response_translator::path::FieldPath;
use response_translator::preference::normalize_language;
use response_translator::provider::TranslationProvider;
use response_translator::translator::Translator;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    file: PathBuf,
    lang: Option<String>,
    fields: Option<Vec<String>>,
    replace: bool,
    response_field: Option<String>,
    detect: bool,
    mock: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut file = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--lang" => parsed.lang = Some(iter.next().context("--lang needs a value")?.clone()),
            "--fields" => {
                let raw = iter.next().context("--fields needs a value")?;
                parsed.fields = Some(parse_list(raw));
            }
            "--response-field" => {
                parsed.response_field = Some(
                    iter.next()
                        .context("--response-field needs a value")?
                        .clone(),
                )
            }
            "--replace" => parsed.replace = true,
            "--detect" => parsed.detect = true,
            "--mock" => parsed.mock = true,
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            path => {
                if file.is_some() {
                    bail!("Only one input file may be given");
                }
                file = Some(PathBuf::from(path));
            }
        }
    }

    parsed.file = file.context("Usage: translate-json <file> --lang <code> [options]")?;
    Ok(parsed)
}

/// Read a body from disk the way the middleware would see it.
fn load_payload(path: &Path) -> Result<Payload> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Payload::parse(raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("response_translator=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    // The mock run needs no key, so configuration is optional there
    let config = if cli.mock {
        Config::from_env().ok()
    } else {
        Some(Config::from_env()?)
    };

    let translator_config = config
        .as_ref()
        .map(Config::translator_config)
        .unwrap_or_default();

    let provider: Arc<dyn TranslationProvider> = match (&config, cli.mock) {
        (_, true) => Arc::new(MockProvider::new(MockMode::Tagged)),
        (Some(config), false) => Arc::new(
            GeminiProvider::from_config(config).context("Failed to initialize Gemini provider")?,
        ),
        (None, false) => bail!("GEMINI_API_KEY not set"),
    };

    let target = cli
        .lang
        .clone()
        .or_else(|| translator_config.default_target_language.clone())
        .context("No target language: pass --lang or set DEFAULT_TARGET_LANGUAGE")?;
    let target = normalize_language(&target)
        .with_context(|| format!("Unsupported language: {}", target))?;

    let fields: Vec<FieldPath> = cli
        .fields
        .clone()
        .or_else(|| config.as_ref().map(|c| c.translate_fields.clone()))
        .unwrap_or_else(|| vec!["message".to_string()])
        .iter()
        .map(|f| FieldPath::parse(f))
        .collect();

    let options = build_apply_options(&cli, config.as_ref());

    let translator = Arc::new(Translator::new(provider, translator_config));
    let formatter = config
        .as_ref()
        .map(|c| ResponseFormatter::new(c.format_options()))
        .unwrap_or_default();
    let orchestrator = TranslationOrchestrator::new(translator.clone()).with_formatter(formatter);

    info!(
        "Translating {} into {} with {}",
        cli.file.display(),
        target,
        translator.provider_name()
    );

    let output = match load_payload(&cli.file)? {
        Payload::Json(doc) => {
            let translated = orchestrator.apply(doc, &fields, Some(target), &options).await;
            serde_json::to_string_pretty(&translated)?
        }
        Payload::Text(text) => orchestrator.translate_text(&text, target, &options).await,
    };

    println!("{}", output);

    let report = translator.metrics().report();
    info!(
        "Done: {} provider calls, {} failures, {} fields kept original",
        report.api_calls, report.api_failures, report.field_fallbacks
    );

    Ok(())
}

fn build_apply_options(cli: &CliArgs, config: Option<&Config>) -> ApplyOptions {
    let base = config.map(Config::apply_options).unwrap_or_default();
    let mut options = if cli.replace {
        ApplyOptions::replace()
    } else if let Some(field) = &cli.response_field {
        ApplyOptions::preserve_at(field)
    } else {
        base.clone()
    };
    options.detect_source_language = cli.detect || base.detect_source_language;
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use response_translator::orchestrator::MergePolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // ==================== Argument Parsing Tests ====================

    #[test]
    fn test_parse_args_full() {
        let cli = parse_args(&args(&[
            "body.json",
            "--lang",
            "es",
            "--fields",
            "message, items.*.title",
            "--replace",
            "--detect",
            "--mock",
        ]))
        .unwrap();

        assert_eq!(cli.file, PathBuf::from("body.json"));
        assert_eq!(cli.lang.as_deref(), Some("es"));
        assert_eq!(
            cli.fields,
            Some(vec!["message".to_string(), "items.*.title".to_string()])
        );
        assert!(cli.replace);
        assert!(cli.detect);
        assert!(cli.mock);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["a.json", "--lang"])).is_err());
        assert!(parse_args(&args(&["a.json", "--bogus"])).is_err());
        assert!(parse_args(&args(&["a.json", "b.json"])).is_err());
    }

    #[test]
    fn test_build_apply_options() {
        let cli = parse_args(&args(&["a.json", "--response-field", "i18n"])).unwrap();
        let options = build_apply_options(&cli, None);
        assert_eq!(options.merge, MergePolicy::PreserveAt(FieldPath::parse("i18n")));
        assert!(!options.detect_source_language);

        let cli = parse_args(&args(&["a.json", "--replace", "--detect"])).unwrap();
        let options = build_apply_options(&cli, None);
        assert_eq!(options.merge, MergePolicy::Replace);
        assert!(options.detect_source_language);
    }

    // ==================== File Loading Tests ====================

    #[test]
    fn test_load_payload_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"message": "Hello"}}"#).unwrap();

        let payload = load_payload(file.path()).unwrap();
        assert_eq!(
            payload,
            Payload::Json(serde_json::json!({"message": "Hello"}))
        );
    }

    #[test]
    fn test_load_payload_plain_text() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Just some words").unwrap();

        let payload = load_payload(file.path()).unwrap();
        assert_eq!(payload, Payload::Text("Just some words".to_string()));
    }

    #[test]
    fn test_load_payload_missing_file() {
        let err = load_payload(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
