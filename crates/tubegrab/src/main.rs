mod backend;
mod opener;

use clap::{Parser, Subcommand, ValueEnum};
use console::{Term, style};
use dialoguer::{Confirm, theme::ColorfulTheme};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tubegrab_config::{
    KeySource, TubeGrabConfig, load_config, resolve_listen_addr, resolve_progress_timing,
    resolve_provider_timeout,
};
use tubegrab_core::{MediaFormat, TubeGrabError, TubeGrabResult};
use tubegrab_session::{
    ConversionBackend, RemoteBackend, STAGES, Session, SessionEvent, SessionState, run_attempt,
};

use crate::backend::{LocalBackend, build_orchestrator};
use crate::opener::open_link;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Mp3,
    Mp4,
}

impl From<FormatArg> for MediaFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Mp3 => MediaFormat::Audio,
            FormatArg::Mp4 => MediaFormat::Video,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the conversion endpoint
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Convert a single video URL
    Convert {
        #[arg(value_name = "URL")]
        url: String,
        #[arg(long, value_enum, default_value = "mp3")]
        format: FormatArg,
        #[arg(long)]
        quality: Option<String>,
        /// Post to a deployed endpoint instead of converting in-process
        #[arg(long)]
        endpoint: Option<String>,
        /// Confirm you hold the rights to the content without prompting
        #[arg(long, short = 'y')]
        yes: bool,
        /// Print only the download link
        #[arg(long)]
        simple: bool,
        /// Open the download link once the conversion completes
        #[arg(long)]
        open: bool,
    },
}

#[derive(Debug, Parser)]
#[command(name = "tubegrab")]
#[command(version, about = "Video to MP3/MP4 conversion through an external provider", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err}", style("Error:").red());
            std::process::exit(1);
        }
    };

    let outcome = match cli.command {
        Commands::Serve { host, port } => run_serve(&config, host, port).await,
        Commands::Convert {
            url,
            format,
            quality,
            endpoint,
            yes,
            simple,
            open,
        } => {
            let options = ConvertOptions {
                format: format.into(),
                quality,
                endpoint,
                assume_consent: yes,
                simple,
                open,
            };
            run_convert(&config, &url, options).await
        }
    };

    if let Err(err) = outcome {
        eprintln!("{} {err}", style("Error:").red());
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_serve(
    config: &TubeGrabConfig,
    host: Option<String>,
    port: Option<u16>,
) -> TubeGrabResult<()> {
    let (default_host, default_port) = resolve_listen_addr(config)?;
    let host = host.unwrap_or(default_host);
    let port = port.unwrap_or(default_port);

    if KeySource::from_config(config).read().is_none() {
        warn!("provider credential is not set; requests will fail until it is");
    }

    let orchestrator = build_orchestrator(config)?;
    info!(%host, port, "starting conversion endpoint");
    tubegrab_server::serve(&host, port, orchestrator).await
}

struct ConvertOptions {
    format: MediaFormat,
    quality: Option<String>,
    endpoint: Option<String>,
    assume_consent: bool,
    simple: bool,
    open: bool,
}

async fn run_convert(
    config: &TubeGrabConfig,
    url: &str,
    options: ConvertOptions,
) -> TubeGrabResult<()> {
    let (total, tick) = resolve_progress_timing(config);
    let mut session = Session::new(total).apply(SessionEvent::SelectFormat(options.format));
    if let Some(quality) = options.quality {
        session = session.apply(SessionEvent::SelectQuality(quality));
        if let Some(notice) = session.notice() {
            return Err(TubeGrabError::UnsupportedInput(notice.to_string()));
        }
    }

    session = session.apply(SessionEvent::Submit(url.to_string()));
    if session.state() != SessionState::AwaitingConsent {
        let notice = session.notice().unwrap_or("nothing to convert").to_string();
        return Err(TubeGrabError::InvalidInput(notice));
    }

    if !(options.assume_consent || prompt_consent()?) {
        session = session.apply(SessionEvent::Decline);
        info!(state = ?session.state(), "conversion declined");
        println!("{} conversion cancelled", style("Cancelled:").yellow());
        return Ok(());
    }
    session = session.apply(SessionEvent::Accept);

    if !options.simple {
        print_preview(&session);
    }

    let backend: Box<dyn ConversionBackend> = match options.endpoint {
        Some(endpoint) => Box::new(RemoteBackend::new(
            endpoint,
            resolve_provider_timeout(config),
        )?),
        None => Box::new(LocalBackend::new(build_orchestrator(config)?)),
    };

    let term = Term::stderr();
    let mut last_percent = None;
    let session = run_attempt(session, backend.as_ref(), tick, |session| {
        if options.simple {
            return;
        }
        render_progress(&term, session, &mut last_percent);
    })
    .await;
    if !options.simple {
        let _ = term.clear_line();
    }

    let download_url = print_outcome(&session, options.simple)?;
    if options.open {
        open_link(download_url)?;
    }
    Ok(())
}

fn prompt_consent() -> TubeGrabResult<bool> {
    println!(
        "{} This video may be protected by copyright.",
        style("Copyright Notice:").bold().yellow()
    );
    println!("Permitted uses:");
    for item in [
        "Creative Commons licensed content",
        "Your own uploaded videos",
        "Content you have permission to use",
        "Educational fair use (varies by region)",
    ] {
        println!("  - {item}");
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("I have the rights to download this content")
        .default(false)
        .interact()
        .map_err(|err| TubeGrabError::InvalidInput(format!("confirmation failed: {err}")))
}

fn print_preview(session: &Session) {
    if let Some(id) = session.video_id() {
        println!("{} {}", style("Video:").cyan(), id);
    }
    if let Some(thumbnail) = session.preview_thumbnail() {
        println!("  {} {}", style("Thumbnail:").dim(), thumbnail);
    }
    println!(
        "  {} {} / {}",
        style("Output:").dim(),
        session.format(),
        session.format().quality_label(session.quality())
    );
}

fn render_progress(term: &Term, session: &Session, last_percent: &mut Option<u8>) {
    if session.state() != SessionState::InProgress {
        return;
    }
    let Some(progress) = session.progress() else {
        return;
    };
    let percent = progress.percent();
    if *last_percent == Some(percent) {
        return;
    }
    *last_percent = Some(percent);

    let markers: String = (0..STAGES.len())
        .map(|index| if index <= progress.stage_index() { '■' } else { '□' })
        .collect();
    let _ = term.clear_line();
    let _ = term.write_str(&format!(
        "{} {markers} {percent:>3}% {}",
        style("Converting").cyan(),
        progress.stage()
    ));
}

fn print_outcome(session: &Session, simple: bool) -> TubeGrabResult<&str> {
    match (session.state(), session.result(), session.failure()) {
        (SessionState::Complete, Some(result), _) => {
            if simple {
                println!("{}", result.download_url);
                return Ok(&result.download_url);
            }
            println!("{} {}", style("Conversion complete:").green(), result.title);
            println!(
                "  {} {} / {}",
                style("Format:").dim(),
                result.format,
                result.format.quality_label(&result.quality)
            );
            println!("{} {}", style("Download:").green(), result.download_url);
            Ok(&result.download_url)
        }
        (_, _, Some(failure)) => {
            if let Some(details) = &failure.body.details {
                eprintln!("  {} {details}", style("Details:").dim());
            }
            Err(TubeGrabError::Conversion(failure.clone()))
        }
        _ => Err(TubeGrabError::Network(
            "conversion ended without a result".to_string(),
        )),
    }
}
