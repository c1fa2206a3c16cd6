use amlunpack::{Archive, ArchiveEntry, Manifest, ManifestEntry};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

#[derive(Parser, Debug)]
#[command(about = "Unpack AML_Arciver texture archives into PNG images")]
struct Arguments {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode every texture in the archive and export it as PNG
    Unpack {
        archive: PathBuf,

        #[command(flatten)]
        args: UnpackArgs,
    },

    /// List the entries of an archive without exporting anything
    List { archive: PathBuf },
}

#[derive(Args, Debug, Clone)]
struct UnpackArgs {
    /// The output directory, defaults to '<archive>_unpack'
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Remove the output directory first if it already exists
    #[arg(long)]
    force: bool,

    /// Number of worker threads, defaults to one per core
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Do not write manifest.toml
    #[arg(long)]
    no_manifest: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();
    colog::init();

    match args.command {
        Commands::Unpack { archive, args } => unpack(&archive, args),
        Commands::List { archive } => list(&archive),
    }
}

fn open_archive(path: &Path) -> anyhow::Result<Archive> {
    let archive = Archive::open(path)
        .with_context(|| format!("Failed to open archive '{}'", path.display()))?;

    log::info!(
        "Loaded archive '{}' with {} entries",
        path.display(),
        archive.len()
    );

    Ok(archive)
}

fn list(path: &Path) -> anyhow::Result<()> {
    let archive = open_archive(path)?;

    for entry in archive.entries() {
        match entry.tex_info() {
            Ok(info) => log::info!(
                "{:4} {} ({} bytes): {:?} {}x{}",
                entry.index,
                entry.name,
                entry.data.len(),
                info.format,
                info.width,
                info.height
            ),
            Err(err) => log::warn!(
                "{:4} {} ({} bytes): {:#}",
                entry.index,
                entry.name,
                entry.data.len(),
                anyhow::Error::from(err)
            ),
        }
    }

    Ok(())
}

fn unpack(path: &Path, args: UnpackArgs) -> anyhow::Result<()> {
    let archive = open_archive(path)?;

    let out_dir = args.out_dir.clone().unwrap_or_else(|| {
        let mut dir = path.as_os_str().to_owned();
        dir.push("_unpack");
        dir.into()
    });

    if args.force && out_dir.exists() {
        fs::remove_dir_all(&out_dir).with_context(|| "Failed to clean up old output directory")?;
    }
    fs::create_dir_all(&out_dir).with_context(|| "Failed to create output directory")?;

    let entries = archive.entries().collect::<Vec<_>>();

    let pool = {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(jobs) = args.jobs {
            builder = builder.num_threads(jobs);
        }
        builder
            .build()
            .with_context(|| "Failed to start worker threads")?
    };

    log::info!("Unpacking to '{}'...", out_dir.display());
    let (exported, failed) = pool.install(|| export_entries(&entries, &out_dir));

    if !args.no_manifest {
        let manifest = Manifest::new(path.display().to_string(), exported);
        let manifest_path = out_dir.join("manifest.toml");

        fs::write(&manifest_path, manifest.to_toml()?)
            .with_context(|| format!("Failed to write '{}'", manifest_path.display()))?;

        log::info!(
            "Done! Exported {} entries, {} failed",
            manifest.entries.len(),
            failed
        );
    } else {
        log::info!("Done! {} entries failed", failed);
    }

    Ok(())
}

fn export_entries(entries: &[ArchiveEntry], out_dir: &Path) -> (Vec<ManifestEntry>, usize) {
    use indicatif::ProgressBar;
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let progress = ProgressBar::new(entries.len() as u64);

    let failed = AtomicUsize::new(0);
    let exported = Mutex::new(Vec::with_capacity(entries.len()));

    entries.par_iter().for_each(|entry| {
        progress.inc(1);

        match export_entry(entry, out_dir) {
            Ok(manifest_entry) => {
                progress.println(format!("{} > {}", entry.name, manifest_entry.file));
                if let Ok(mut exported) = exported.lock() {
                    exported.push(manifest_entry);
                }
            }
            Err(err) => {
                log::error!("Skipping '{}': {:#}", entry.name, err);
                failed.fetch_add(1, Ordering::SeqCst);
            }
        }
    });

    progress.finish_and_clear();

    let exported = exported
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    (exported, failed.load(Ordering::SeqCst))
}

fn export_entry(entry: &ArchiveEntry, out_dir: &Path) -> anyhow::Result<ManifestEntry> {
    let decoded = entry.decode()?;

    let file = format!("{}.png", entry.file_stem());
    let path = out_dir.join(&file);

    decoded
        .image
        .save(&path)
        .with_context(|| format!("Failed to save '{}'", path.display()))?;

    Ok(ManifestEntry::new(entry, &decoded, file))
}
