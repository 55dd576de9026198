//! # Laurea CLI
//!
//! Command-line interface for the certificate template engine.
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP API
//! laurea serve --listen 0.0.0.0:8080
//!
//! # Render a bound certificate to PNG
//! laurea preview --template template.json --binding binding.json --out preview.png
//!
//! # Export a certificate PDF (file name derives from the recipient)
//! laurea export --template template.json --binding binding.json
//!
//! # Sharper output
//! laurea export --template template.json --binding binding.json --scale 3
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use laurea::{
    LaureaError, export,
    render::Rasterizer,
    resolve::{self, AssetResolver, BindingContext, ResolvedCertificate},
    server::{ServerConfig, serve},
    template::Template,
};

/// Laurea - Certificate template design and rendering
#[derive(Parser, Debug)]
#[command(name = "laurea")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,
    },

    /// Render a bound certificate to a PNG file
    Preview {
        /// Template document (JSON)
        #[arg(long)]
        template: PathBuf,

        /// Recipient binding data (JSON); omit for the unbound preview
        #[arg(long)]
        binding: Option<PathBuf>,

        /// Output PNG path
        #[arg(long)]
        out: PathBuf,

        /// Pixel-density multiplier
        #[arg(long, default_value = "1.0")]
        scale: f32,
    },

    /// Render a bound certificate and wrap it in a one-page PDF
    Export {
        /// Template document (JSON)
        #[arg(long)]
        template: PathBuf,

        /// Recipient binding data (JSON)
        #[arg(long)]
        binding: Option<PathBuf>,

        /// Directory to write the PDF into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Pixel-density multiplier
        #[arg(long, default_value = "2.0")]
        scale: f32,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), LaureaError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen } => {
            serve(ServerConfig {
                listen_addr: listen,
            })
            .await?;
        }

        Commands::Preview {
            template,
            binding,
            out,
            scale,
        } => {
            let (resolved, _) = load_and_resolve(&template, binding.as_deref()).await?;
            let png = Rasterizer::new(scale).render_png(&resolved)?;
            std::fs::write(&out, png)?;
            println!("Saved to {}", out.display());
        }

        Commands::Export {
            template,
            binding,
            out_dir,
            scale,
        } => {
            let (resolved, ctx) = load_and_resolve(&template, binding.as_deref()).await?;
            let page = Rasterizer::new(scale).render(&resolved)?;
            let recipient = ctx.student_name.trim();
            let exported =
                export::export_pdf(&page, (!recipient.is_empty()).then_some(recipient))?;
            let path = out_dir.join(&exported.file_name);
            std::fs::write(&path, exported.bytes)?;
            println!("Saved to {}", path.display());
        }
    }

    Ok(())
}

/// Load the template and binding files, resolve, and fetch image assets.
async fn load_and_resolve(
    template_path: &std::path::Path,
    binding_path: Option<&std::path::Path>,
) -> Result<(ResolvedCertificate, BindingContext), LaureaError> {
    let template = Template::from_json(&std::fs::read_to_string(template_path)?)?;

    let ctx = match binding_path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)
            .map_err(|e| LaureaError::Parse(format!("Invalid binding file: {}", e)))?,
        None => BindingContext::default(),
    };

    let mut resolved = resolve::resolve(&template, &ctx)?;
    AssetResolver::new().materialize(&mut resolved).await?;
    Ok((resolved, ctx))
}
