//! # megamesh
//!
//! Inspect mesh assets and write sample ones.
//!
//! ```text
//! megamesh sample assets --name props
//! megamesh inspect assets/props.smeshdecl --dedup linear
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use glam::{Vec3, Vec4};
use thiserror::Error;

use megamesh::mesh_file::{load_mesh_files, write_mesh_files};
use megamesh::{
    DedupStrategy, DummyBackend, MegaMeshBuffer, MegaMeshConfig, MegaMeshError, Mesh,
    MeshFileError,
};

#[derive(Parser, Debug)]
#[command(name = "megamesh", version, about = "Inspect and write mesh assets")]
struct Args {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load an asset, merge its meshes and report the result.
    Inspect {
        /// Path to a `.smeshdecl` file.
        decl: PathBuf,

        /// Vertex matching used while merging.
        #[arg(long, default_value = "hashed", value_enum)]
        dedup: CliDedup,
    },
    /// Write a sample asset holding a quad and a cube.
    Sample {
        /// Output directory.
        dir: PathBuf,

        /// Asset name.
        #[arg(long, default_value = "sample")]
        name: String,
    },
}

/// Vertex matching selection for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliDedup {
    /// Compare against every stored vertex.
    Linear,
    /// Hash lookup.
    Hashed,
}

impl From<CliDedup> for DedupStrategy {
    fn from(value: CliDedup) -> Self {
        match value {
            CliDedup::Linear => DedupStrategy::LinearScan,
            CliDedup::Hashed => DedupStrategy::Hashed,
        }
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    File(#[from] MeshFileError),
    #[error(transparent)]
    Mesh(#[from] MegaMeshError),
}

fn inspect(decl: PathBuf, dedup: DedupStrategy) -> Result<(), CliError> {
    let data = load_mesh_files(&decl)?;
    log::info!(
        "Asset '{}': {} meshes declared, {} vertices in {}",
        data.name,
        data.mesh_count,
        data.vertex_count,
        data.binary_blob_path.display()
    );

    let mut mega = MegaMeshBuffer::with_config(MegaMeshConfig {
        dedup,
        label: data.name.clone(),
    });
    let handles: Vec<_> = data.meshes.iter().map(|mesh| mega.add_mesh(mesh)).collect();

    let mut backend = DummyBackend::new();
    let result = mega.create_buffer(&mut backend);
    let bytes = backend.live_bytes();
    mega.destroy_buffer(&mut backend);
    result?;

    let unique = mega.vertices().len();
    let total = mega.indices().len();
    let ratio = if total == 0 {
        1.0
    } else {
        unique as f64 / total as f64
    };

    println!("asset:           {}", data.name);
    println!("meshes:          {}", mega.mesh_count());
    println!("unique vertices: {unique}");
    println!("indices:         {total}");
    println!("dedup ratio:     {ratio:.3}");
    println!("gpu bytes:       {bytes}");
    for handle in handles {
        let offset = mega.mesh_offset(handle)?;
        println!("  mesh {:>4}: indices {:?}", handle.index(), offset.index_range());
    }
    Ok(())
}

fn sample(dir: PathBuf, name: &str) -> Result<(), CliError> {
    std::fs::create_dir_all(&dir).map_err(|e| MeshFileError::Io {
        path: dir.clone(),
        source: e,
    })?;

    let meshes = [
        Mesh::quad(Vec4::new(1.0, 0.8, 0.2, 1.0)),
        Mesh::cube(Vec4::new(0.2, 0.6, 1.0, 1.0)).with_base_scale(Vec3::splat(0.5)),
    ];
    let paths = write_mesh_files(&dir, name, &meshes)?;
    println!("{}", paths.declaration.display());
    println!("{}", paths.binary.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();
    megamesh::init();

    let result = match args.command {
        Command::Inspect { decl, dedup } => inspect(decl, dedup.into()),
        Command::Sample { dir, name } => sample(dir, &name),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
