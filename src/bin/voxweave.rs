use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use voxweave::{FragmentId, HttpSpeechRenderer, NarrationPlan, NarrationSession, ProjectStore};

#[derive(Parser, Debug)]
#[command(name = "voxweave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize one fragment from a narration plan into its MP3 slot.
    Synth(SynthArgs),
    /// Save every fragment, then compose the final mix (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// List the background catalog of a project root.
    Backgrounds(BackgroundsArgs),
}

#[derive(Parser, Debug)]
struct SynthArgs {
    /// Input narration plan JSON.
    #[arg(long)]
    plan: PathBuf,

    /// Project root holding fragments/, backgrounds/ and output/.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// 1-based fragment index to synthesize.
    #[arg(long)]
    fragment: u32,

    /// Speech service endpoint URL.
    #[arg(long)]
    tts_url: String,

    /// Bearer token for the speech service.
    #[arg(long)]
    api_key: Option<String>,

    /// Timeout in seconds for one synthesis request.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input narration plan JSON.
    #[arg(long)]
    plan: PathBuf,

    /// Project root holding fragments/, backgrounds/ and output/.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Output name; the final mix lands at output/<name>.mp3.
    #[arg(long)]
    out: String,

    /// Speech service endpoint URL.
    #[arg(long)]
    tts_url: String,

    /// Bearer token for the speech service.
    #[arg(long)]
    api_key: Option<String>,

    /// Timeout in seconds for one synthesis request.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

#[derive(Parser, Debug)]
struct BackgroundsArgs {
    /// Project root holding fragments/, backgrounds/ and output/.
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Synth(args) => cmd_synth(args),
        Command::Render(args) => cmd_render(args),
        Command::Backgrounds(args) => cmd_backgrounds(args),
    }
}

fn make_renderer(
    url: &str,
    api_key: Option<&str>,
    timeout_secs: u64,
) -> anyhow::Result<HttpSpeechRenderer> {
    let mut renderer = HttpSpeechRenderer::with_timeout(url, Duration::from_secs(timeout_secs))?;
    if let Some(key) = api_key {
        renderer = renderer.with_api_key(key);
    }
    Ok(renderer)
}

fn cmd_synth(args: SynthArgs) -> anyhow::Result<()> {
    let plan = NarrationPlan::from_path(&args.plan)
        .with_context(|| format!("load narration plan '{}'", args.plan.display()))?;
    let session = NarrationSession::from_plan(&args.root, &plan)?;
    let id = FragmentId::new(args.fragment)?;
    let renderer = make_renderer(&args.tts_url, args.api_key.as_deref(), args.timeout_secs)?;

    match session.save_fragment(id, &renderer, &plan.config)? {
        Some(path) => eprintln!("wrote {}", path.display()),
        None => eprintln!("fragment {id} is empty, nothing to do"),
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let plan = NarrationPlan::from_path(&args.plan)
        .with_context(|| format!("load narration plan '{}'", args.plan.display()))?;
    let session = NarrationSession::from_plan(&args.root, &plan)?;
    let renderer = make_renderer(&args.tts_url, args.api_key.as_deref(), args.timeout_secs)?;

    for n in 1..=session.fragment_count() as u32 {
        let id = FragmentId(n);
        let saved = session
            .save_fragment(id, &renderer, &plan.config)
            .with_context(|| format!("save fragment {id}"))?;
        if let Some(path) = saved {
            eprintln!("wrote {}", path.display());
        }
    }

    match session.compose(&args.out, &plan.config)? {
        Some(path) => eprintln!("wrote {}", path.display()),
        None => eprintln!("output name is empty, nothing to do"),
    }
    Ok(())
}

fn cmd_backgrounds(args: BackgroundsArgs) -> anyhow::Result<()> {
    let store = ProjectStore::new(&args.root);
    let names = store.list_backgrounds()?;
    if names.is_empty() {
        eprintln!("no backgrounds in {}", store.backgrounds_dir().display());
        return Ok(());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}
