use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use glowup::{
    AppConfig, EditDocument, EditorSession, FontBook, Gateway, LocalGateway, PhotoId,
    SignUpMetadata,
};

#[derive(Parser, Debug)]
#[command(name = "glowup", version)]
struct Cli {
    /// JSON config file (defaults plus GLOWUP_* environment variables when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a photo with an edit document into a PNG.
    Render(RenderArgs),
    /// Print the live-preview filter expression of an edit document.
    Preview(PreviewArgs),
    /// Create an account in the local gateway.
    Signup(SignupArgs),
    /// Manage the signed-in user's saved photos.
    Gallery(GalleryArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Source image.
    #[arg(long)]
    image: PathBuf,

    /// Edit document JSON. Without it the photo is re-encoded unchanged.
    #[arg(long)]
    edit: Option<PathBuf>,

    /// Output PNG path, or a directory to receive `glowup-<ms>.png`.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Edit document JSON.
    #[arg(long)]
    edit: PathBuf,
}

#[derive(Args, Debug)]
struct Credentials {
    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[command(flatten)]
    creds: Credentials,

    /// Display name stored with the account.
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args, Debug)]
struct GalleryArgs {
    #[command(flatten)]
    creds: Credentials,

    #[command(subcommand)]
    action: GalleryAction,
}

#[derive(Subcommand, Debug)]
enum GalleryAction {
    /// List saved photos, newest first.
    List,
    /// Composite and upload a photo.
    Save {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        edit: Option<PathBuf>,
    },
    /// Delete a saved photo and its stored object.
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Download a saved photo.
    Fetch {
        #[arg(long)]
        id: String,
        #[arg(long)]
        out: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let cfg = AppConfig::load(cli.config.as_deref())?;

    match cli.cmd {
        Command::Render(args) => cmd_render(&cfg, args),
        Command::Preview(args) => cmd_preview(args),
        Command::Signup(args) => cmd_signup(&cfg, args),
        Command::Gallery(args) => cmd_gallery(&cfg, args),
    }
}

fn read_edit(path: Option<&Path>) -> anyhow::Result<EditDocument> {
    Ok(match path {
        Some(p) => EditDocument::from_path(p)?,
        None => EditDocument::default(),
    })
}

fn open_session(cfg: &AppConfig, fonts: FontBook) -> anyhow::Result<EditorSession<LocalGateway>> {
    let session = EditorSession::new(cfg.open_gateway()?, fonts)?;
    Ok(match cfg.sticker_seed {
        Some(seed) => session.with_overlay_seed(seed),
        None => session,
    })
}

fn flush_notices<G: Gateway>(session: &mut EditorSession<G>) {
    for notice in session.take_notices() {
        eprintln!("{notice}");
    }
}

fn load_edit<G: Gateway>(
    cfg: &AppConfig,
    session: &mut EditorSession<G>,
    image: &Path,
    edit: Option<&Path>,
) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(image).with_context(|| format!("read image '{}'", image.display()))?;
    session.load_image(bytes)?;
    session.apply_document(&read_edit(edit)?, cfg.sticker_seed)?;
    Ok(())
}

fn cmd_render(cfg: &AppConfig, args: RenderArgs) -> anyhow::Result<()> {
    let mut session = open_session(cfg, cfg.font_book()?)?;
    let loaded = load_edit(cfg, &mut session, &args.image, args.edit.as_deref());
    flush_notices(&mut session);
    loaded?;

    let written = if args.out.is_dir() {
        session.download_to(&args.out)?
    } else {
        if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let png = session.export_png()?;
        std::fs::write(&args.out, png)
            .with_context(|| format!("write png '{}'", args.out.display()))?;
        args.out
    };
    flush_notices(&mut session);
    eprintln!("wrote {}", written.display());
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let doc = EditDocument::from_path(&args.edit)?;
    println!("{}", doc.adjustment_state().preview_expression());
    Ok(())
}

fn cmd_signup(cfg: &AppConfig, args: SignupArgs) -> anyhow::Result<()> {
    let mut session = open_session(cfg, FontBook::empty())?;
    let result = session.sign_up(
        &args.creds.email,
        &args.creds.password,
        SignUpMetadata { name: args.name },
    );
    flush_notices(&mut session);
    let user = result?;
    println!("{}", user.id);
    Ok(())
}

fn cmd_gallery(cfg: &AppConfig, args: GalleryArgs) -> anyhow::Result<()> {
    let fonts = match &args.action {
        GalleryAction::Save { .. } => cfg.font_book()?,
        _ => FontBook::empty(),
    };
    let mut session = open_session(cfg, fonts)?;
    let signed_in = session.sign_in(&args.creds.email, &args.creds.password);
    flush_notices(&mut session);
    signed_in?;

    let result: anyhow::Result<()> = match args.action {
        GalleryAction::List => session
            .refresh_gallery()
            .map(|photos| {
                for photo in photos {
                    println!(
                        "{}\t{}\t{}\t{}",
                        photo.id,
                        photo.created_at.to_rfc3339(),
                        photo.name,
                        photo.url
                    );
                }
            })
            .map_err(Into::into),
        GalleryAction::Save { image, edit } => {
            load_edit(cfg, &mut session, &image, edit.as_deref()).and_then(|()| {
                let saved = session.save_to_gallery()?;
                println!("{}\t{}", saved.id, saved.url);
                Ok(())
            })
        }
        GalleryAction::Delete { id } => session.delete_photo(&PhotoId(id)).map_err(Into::into),
        GalleryAction::Fetch { id, out } => {
            session.load_from_gallery(&PhotoId(id)).map_err(Into::into).and_then(|()| {
                let bytes = session.source().unwrap_or_default();
                std::fs::write(&out, bytes)
                    .with_context(|| format!("write png '{}'", out.display()))?;
                eprintln!("wrote {}", out.display());
                Ok(())
            })
        }
    };
    flush_notices(&mut session);
    result?;
    Ok(())
}
