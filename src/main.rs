use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cumread::{
    app::{SubmissionController, SubmissionGuard, SubmissionReport, TransformService},
    domain::{
        Credential, ProviderId, SettingsKey, SettingsStore, credential_for, default_provider,
    },
    infra::{
        host::{FileEditorSink, StderrNotifier, WriterEditorSink},
        llm::ProviderRegistry,
        settings::JsonFileSettingsStore,
    },
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_SETTINGS_PATH: &str = "cumread-settings.json";

/// Convert English text into cumulative-reading study notes.
#[derive(Parser)]
#[command(name = "cumread", version, about, long_about = None)]
struct Cli {
    /// Settings file holding API keys and the default provider.
    #[arg(long, global = true, env = "CUMREAD_SETTINGS", default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a passage and insert the result into a document or stdout.
    Transform(TransformArgs),

    /// Inspect or change stored settings.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args)]
struct TransformArgs {
    /// Provider to use; defaults to the stored default provider.
    #[arg(long, short)]
    provider: Option<ProviderId>,

    /// Read the passage from this file instead of stdin.
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Insert the result into this document instead of printing it.
    #[arg(long, short)]
    document: Option<PathBuf>,

    /// Byte offset in the document to insert at; defaults to the end.
    #[arg(long, requires = "document")]
    cursor: Option<usize>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the stored settings with API keys masked.
    Show,

    /// Store the API key for a provider.
    SetCredential { provider: ProviderId, value: String },

    /// Choose the provider used when none is given.
    SetDefault { provider: ProviderId },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let result = match cli.command {
        Command::Transform(args) => run_transform(&cli.settings, args),
        Command::Config(command) => run_config(&cli.settings, command, &mut io::stdout()),
    };

    match result {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(%error, "command failed");
            let _ = writeln!(io::stderr(), "Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .init(),
    }
}

fn run_transform(
    settings_path: &Path,
    args: TransformArgs,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let report = submit_passage(settings_path, args)?;
    Ok(exit_code_for(&report))
}

fn submit_passage(
    settings_path: &Path,
    args: TransformArgs,
) -> Result<SubmissionReport, Box<dyn std::error::Error>> {
    let settings = JsonFileSettingsStore::open(settings_path)?;
    let provider = resolve_provider(args.provider, &settings);

    let source_text = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => io::read_to_string(io::stdin())?,
    };

    let service = TransformService::new(ProviderRegistry::from_env()?);
    tracing::info!(%provider, "starting transform");

    let report = match args.document {
        Some(document) => {
            let editor = FileEditorSink::new(document, args.cursor);
            SubmissionController::new(service, SubmissionGuard::new(), editor, StderrNotifier)
                .submit(&source_text, provider, &settings)
        }
        None => {
            let editor = WriterEditorSink::new(io::stdout().lock());
            SubmissionController::new(service, SubmissionGuard::new(), editor, StderrNotifier)
                .submit(&source_text, provider, &settings)
        }
    };

    Ok(report)
}

/// An explicit `--provider` wins over the stored default.
fn resolve_provider(requested: Option<ProviderId>, settings: &dyn SettingsStore) -> ProviderId {
    requested.unwrap_or_else(|| default_provider(settings))
}

fn exit_code_for(report: &SubmissionReport) -> ExitCode {
    ExitCode::from(exit_status_for(report))
}

fn exit_status_for(report: &SubmissionReport) -> u8 {
    match report {
        SubmissionReport::Completed { .. } => 0,
        SubmissionReport::Failed(_) | SubmissionReport::Busy => 1,
    }
}

fn run_config(
    settings_path: &Path,
    command: ConfigCommand,
    out: &mut dyn Write,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut settings = JsonFileSettingsStore::open(settings_path)?;

    match command {
        ConfigCommand::Show => {
            writeln!(out, "settings file: {}", settings.path().display())?;
            for provider in ProviderId::ALL {
                writeln!(
                    out,
                    "{}: {}",
                    SettingsKey::credential_for(provider).as_str(),
                    credential_for(&settings, provider).masked()
                )?;
            }
            writeln!(
                out,
                "{}: {}",
                SettingsKey::DefaultProvider.as_str(),
                default_provider(&settings)
            )?;
        }
        ConfigCommand::SetCredential { provider, value } => {
            if !Credential::new(&value).is_present() {
                tracing::warn!(%provider, "storing a blank API key");
            }
            settings.set(SettingsKey::credential_for(provider), value)?;
            writeln!(out, "{} API key saved.", provider.display_name())?;
        }
        ConfigCommand::SetDefault { provider } => {
            settings.set(SettingsKey::DefaultProvider, provider.as_str().to_string())?;
            writeln!(out, "Default provider set to {provider}.")?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use clap::error::ErrorKind as ClapErrorKind;
    use cumread::app::{SubmissionFailure, SubmissionReport};
    use cumread::domain::{ErrorKind, ProviderId, SettingsKey, TransformFailure};
    use cumread::infra::settings::MemorySettingsStore;

    use super::{
        Cli, Command, ConfigCommand, TransformArgs, exit_status_for, resolve_provider, run_config,
        submit_passage,
    };

    struct TempFile(PathBuf);

    impl TempFile {
        fn new(name: &str, extension: &str) -> Self {
            let file_name = format!("cumread-cli-{name}-{}.{extension}", std::process::id());
            Self(std::env::temp_dir().join(file_name))
        }

        fn with_contents(name: &str, extension: &str, contents: &str) -> Self {
            let file = Self::new(name, extension);
            fs::write(file.path(), contents).expect("temp file should be writable");
            file
        }

        fn path(&self) -> &Path {
            &self.0
        }

        fn read(&self) -> String {
            fs::read_to_string(&self.0).expect("temp file must exist")
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    fn failed_transform(report: SubmissionReport) -> TransformFailure {
        match report {
            SubmissionReport::Failed(SubmissionFailure::Transform(failure)) => failure,
            SubmissionReport::Failed(SubmissionFailure::Editor(error)) => {
                panic!("expected a transform failure, got editor error {error}")
            }
            SubmissionReport::Completed { .. } => panic!("expected failure, got completion"),
            SubmissionReport::Busy => panic!("expected failure, got busy"),
        }
    }

    #[test]
    fn exit_status_is_zero_only_for_completed_submissions() {
        let failed = SubmissionReport::Failed(SubmissionFailure::Transform(
            TransformFailure::empty_input(),
        ));

        assert_eq!(exit_status_for(&SubmissionReport::Completed { chars: 42 }), 0);
        assert_eq!(exit_status_for(&failed), 1);
        assert_eq!(exit_status_for(&SubmissionReport::Busy), 1);
    }

    #[test]
    fn transform_command_parses_all_options() {
        let cli = Cli::try_parse_from([
            "cumread",
            "transform",
            "--provider",
            "Groq",
            "--input",
            "passage.txt",
            "--document",
            "notes.md",
            "--cursor",
            "12",
            "--settings",
            "custom.json",
        ])
        .expect("transform arguments should parse");

        assert_eq!(cli.settings, PathBuf::from("custom.json"));
        let Command::Transform(args) = cli.command else {
            panic!("expected the transform command");
        };
        assert_eq!(args.provider, Some(ProviderId::Groq));
        assert_eq!(args.input, Some(PathBuf::from("passage.txt")));
        assert_eq!(args.document, Some(PathBuf::from("notes.md")));
        assert_eq!(args.cursor, Some(12));
    }

    #[test]
    fn cursor_without_document_is_rejected() {
        let error = Cli::try_parse_from(["cumread", "transform", "--cursor", "3"])
            .err()
            .expect("cursor alone should be rejected");

        assert_eq!(error.kind(), ClapErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let transform = Cli::try_parse_from(["cumread", "transform", "-p", "openai"]);
        let set_default = Cli::try_parse_from(["cumread", "config", "set-default", "openai"]);

        assert!(transform.is_err());
        assert!(set_default.is_err());
    }

    #[test]
    fn config_commands_parse() {
        let cli = Cli::try_parse_from(["cumread", "config", "set-credential", "gemini", "k-1"])
            .expect("set-credential should parse");
        let Command::Config(ConfigCommand::SetCredential { provider, value }) = cli.command else {
            panic!("expected config set-credential");
        };
        assert_eq!(provider, ProviderId::Gemini);
        assert_eq!(value, "k-1");

        let cli = Cli::try_parse_from(["cumread", "config", "set-default", "groq"])
            .expect("set-default should parse");
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::SetDefault {
                provider: ProviderId::Groq,
            })
        ));

        let cli = Cli::try_parse_from(["cumread", "config", "show"])
            .expect("show should parse");
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Show)));
    }

    #[test]
    fn explicit_provider_wins_over_stored_default() {
        let empty = MemorySettingsStore::new();
        let groq_default = MemorySettingsStore::new()
            .with(SettingsKey::DefaultProvider, "groq");

        assert_eq!(resolve_provider(None, &empty), ProviderId::Gemini);
        assert_eq!(resolve_provider(None, &groq_default), ProviderId::Groq);
        assert_eq!(
            resolve_provider(Some(ProviderId::Gemini), &groq_default),
            ProviderId::Gemini
        );
    }

    #[test]
    fn config_show_masks_stored_credentials() {
        let settings = TempFile::new("show", "json");
        let secret = "AIzaSyExampleSecret1234";

        run_config(
            settings.path(),
            ConfigCommand::SetCredential {
                provider: ProviderId::Gemini,
                value: secret.to_string(),
            },
            &mut io::sink(),
        )
        .expect("credential should be stored");
        run_config(
            settings.path(),
            ConfigCommand::SetDefault {
                provider: ProviderId::Groq,
            },
            &mut io::sink(),
        )
        .expect("default provider should be stored");

        let mut out: Vec<u8> = Vec::new();
        run_config(settings.path(), ConfigCommand::Show, &mut out)
            .expect("show should succeed");
        let shown = String::from_utf8(out).expect("output should be UTF-8");

        assert!(shown.contains("geminiCredential: ****1234"));
        assert!(shown.contains("groqCredential: (not set)"));
        assert!(shown.contains("defaultProvider: groq"));
        assert!(!shown.contains(secret));
    }

    #[test]
    fn omitted_provider_uses_stored_default_and_fails_without_key() {
        let settings = TempFile::with_contents("default", "json", r#"{"defaultProvider":"groq"}"#);
        let input = TempFile::with_contents("default-input", "txt", "The storm passed.");

        let report = submit_passage(
            settings.path(),
            TransformArgs {
                provider: None,
                input: Some(input.path().to_path_buf()),
                document: None,
                cursor: None,
            },
        )
        .expect("submission should run");

        assert_eq!(exit_status_for(&report), 1);
        let failure = failed_transform(report);
        assert_eq!(failure.kind, ErrorKind::MissingCredential);
        assert_eq!(failure.provider, Some(ProviderId::Groq));
    }

    #[test]
    fn blank_input_fails_before_any_request() {
        let settings = TempFile::new("blank", "json");
        let input = TempFile::with_contents("blank-input", "txt", "  \n");
        let document = TempFile::with_contents("blank-doc", "md", "kept\n");

        let report = submit_passage(
            settings.path(),
            TransformArgs {
                provider: Some(ProviderId::Gemini),
                input: Some(input.path().to_path_buf()),
                document: Some(document.path().to_path_buf()),
                cursor: None,
            },
        )
        .expect("submission should run");

        assert_eq!(failed_transform(report).kind, ErrorKind::EmptyInput);
        assert_eq!(document.read(), "kept\n");
    }
}
