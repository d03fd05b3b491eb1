/* Generate command - render flyweights from an IR file */

use anyhow::Context;
use sbe_gen::{DirectoryOutputManager, Generator, GeneratorOptions};
use sbe_ir::IntermediateRepresentation;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/* File written by `--bundle` */
pub const BUNDLE_FILE: &str = "flyweights.rs";

pub struct GenerateArgs {
  pub ir: PathBuf,
  pub output_dir: PathBuf,
  pub codec_crate: String,
  pub package: Option<String>,
  pub bundle: bool,
}

/* Execute the generate command */
pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
  let ir = IntermediateRepresentation::load(&args.ir)
    .with_context(|| format!("failed to load IR from {}", args.ir.display()))?;
  ir.validate().with_context(|| format!("malformed IR in {}", args.ir.display()))?;

  info!(
    package = ir.package_name(),
    types = ir.types().count(),
    messages = ir.messages().count(),
    "loaded IR"
  );

  let options = GeneratorOptions {
    codec_crate: args.codec_crate,
    package_override: args.package,
    emit_module_index: !args.bundle,
  };
  let generator = Generator::new(&ir, options);

  if args.bundle {
    let source = generator.generate_bundle().context("code generation failed")?;
    fs::create_dir_all(&args.output_dir)
      .with_context(|| format!("failed to create {}", args.output_dir.display()))?;

    let path = args.output_dir.join(BUNDLE_FILE);
    fs::write(&path, source).with_context(|| format!("failed to write {}", path.display()))?;
    println!("[✓] Generated bundle: {}", path.display());
  } else {
    let mut out = DirectoryOutputManager::new(&args.output_dir);
    let units = generator.generate_all(&mut out).context("code generation failed")?;
    println!("[✓] Generated {} unit(s) in {}", units.len(), out.dir().display());
  }

  Ok(())
}
