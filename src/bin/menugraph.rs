use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use menugraph::{
    AcceptAll, AnimatorGraph, Generator, GeneratorConfig, ItemKind, MenuAsset, MenuProject,
    ParameterTable, RemotingAddress, SceneIndex, SceneQuery, export_address,
};

#[derive(Parser, Debug)]
#[command(name = "menugraph", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one generation over a project.
    Compile(CompileArgs),
    /// Write the remoting address tree of a project.
    ExportRemoting(ExportArgs),
    /// Load an address tree into a remote-tree item.
    ImportRemoting(ImportArgs),
    /// Append a remote-control copy of a submenu next to it.
    CloneRemoting(CloneArgs),
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Menu project JSON.
    #[arg(long)]
    project: PathBuf,

    /// Parameter table JSON; read if present and rewritten after the run.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Generator config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scene index JSON used to resolve object and property references.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Graph JSON; non-generated content of an existing file is kept.
    #[arg(long)]
    graph_out: PathBuf,

    /// Mirrored menu JSON.
    #[arg(long)]
    menu_out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Menu project JSON.
    #[arg(long)]
    project: PathBuf,

    /// Output address JSON.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ImportArgs {
    /// Menu project JSON, rewritten in place.
    #[arg(long)]
    project: PathBuf,

    /// Identity token of the remote-tree item.
    #[arg(long)]
    node: String,

    /// Address JSON exported by the other instance.
    #[arg(long)]
    address: PathBuf,

    /// Generator config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CloneArgs {
    /// Menu project JSON, rewritten in place.
    #[arg(long)]
    project: PathBuf,

    /// Identity token of the submenu to clone.
    #[arg(long)]
    submenu: String,

    /// Generator config JSON; its control cap bounds the page receiving the clone.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compile(args) => cmd_compile(args),
        Command::ExportRemoting(args) => cmd_export(args),
        Command::ImportRemoting(args) => cmd_import(args),
        Command::CloneRemoting(args) => cmd_clone(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GeneratorConfig> {
    match path {
        Some(p) => GeneratorConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

fn load_project(path: &Path) -> anyhow::Result<MenuProject> {
    MenuProject::from_path(path).with_context(|| format!("load project '{}'", path.display()))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    serde_json::to_writer_pretty(f, value)
        .with_context(|| format!("write json '{}'", path.display()))?;
    Ok(())
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let project = load_project(&args.project)?;

    let mut table = match &args.params {
        Some(p) if p.exists() => ParameterTable::from_path(p)
            .with_context(|| format!("load parameter table '{}'", p.display()))?,
        _ => ParameterTable::default(),
    };
    let scene: Box<dyn SceneQuery> = match &args.scene {
        Some(p) => Box::new(
            SceneIndex::from_path(p).with_context(|| format!("load scene '{}'", p.display()))?,
        ),
        None => Box::new(AcceptAll),
    };
    let mut graph = if args.graph_out.exists() {
        AnimatorGraph::from_path(&args.graph_out)
            .with_context(|| format!("load graph '{}'", args.graph_out.display()))?
    } else {
        AnimatorGraph::default()
    };
    let mut menu: MenuAsset = match &args.menu_out {
        Some(p) if p.exists() => {
            let f = File::open(p).with_context(|| format!("open menu '{}'", p.display()))?;
            serde_json::from_reader(BufReader::new(f))
                .with_context(|| format!("parse menu '{}'", p.display()))?
        }
        _ => MenuAsset::default(),
    };

    let mut generator = Generator::new(config)?;
    let stats = generator.generate(&project, scene.as_ref(), &mut table, &mut graph, &mut menu)?;

    write_json(&args.graph_out, &graph)?;
    if let Some(p) = &args.menu_out {
        write_json(p, &menu)?;
    }
    if let Some(p) = &args.params {
        write_json(p, &table)?;
    }
    for w in &stats.warnings {
        eprintln!("warning: {w}");
    }
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let project = load_project(&args.project)?;
    let address = export_address(&project).with_context(|| {
        format!(
            "project '{}' has no remotely toggleable items",
            args.project.display()
        )
    })?;
    write_json(&args.out, &address)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_import(args: ImportArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut project = load_project(&args.project)?;
    let address = RemotingAddress::from_path(&args.address, config.max_menu_controls)
        .with_context(|| format!("load address '{}'", args.address.display()))?;

    let item = project
        .find_mut(&args.node)
        .with_context(|| format!("no item with identity '{}'", args.node))?;
    match &mut item.kind {
        ItemKind::RemoteTree(tree) => tree.address = Some(address),
        other => anyhow::bail!(
            "item '{}' is a {}, not a remote tree",
            args.node,
            other.label()
        ),
    }
    project
        .save(&args.project)
        .with_context(|| format!("save project '{}'", args.project.display()))?;
    eprintln!("imported {} into {}", args.address.display(), args.node);
    Ok(())
}

fn cmd_clone(args: CloneArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut project = load_project(&args.project)?;
    let token = project.add_remoting_clone(&args.submenu, config.max_menu_controls)?;
    project
        .save(&args.project)
        .with_context(|| format!("save project '{}'", args.project.display()))?;
    println!("{token}");
    Ok(())
}
