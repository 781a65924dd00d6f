//! Command-line front end: reads compiled descriptor sets and writes the
//! generated Rust source to standard output.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser};

use wirepb_gen::descriptor::FileDescriptorSet;
use wirepb_gen::{generate, Options};

#[derive(Debug, Parser)]
#[command(
    name = "wirepb-gen",
    version,
    about = "Generator of Rust code from a compiled protobuf schema"
)]
struct Args {
    /// Compiled descriptor set files (protoc --descriptor_set_out output).
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Don't generate the Rust struct.
    #[arg(short = 'c', long)]
    no_class: bool,

    /// Don't generate the decoder.
    #[arg(short = 'd', long)]
    no_decoder: bool,

    /// Don't generate the encoder.
    #[arg(short = 'e', long)]
    no_encoder: bool,

    /// Don't generate has_* presence flags (implies --no-required).
    #[arg(short = 'f', long)]
    no_has_fields: bool,

    /// Ignore the 'required' attribute.
    #[arg(long)]
    no_required: bool,

    /// Ignore schema default values.
    #[arg(long)]
    no_default_values: bool,

    /// Make all repeated fields packed when allowed.
    #[arg(short, long)]
    packed: bool,

    /// Make all repeated fields non-packed.
    #[arg(long)]
    no_packed: bool,

    /// Rust type for string/bytes fields [default: String / Vec<u8>].
    #[arg(short = 's', long, value_name = "TYPE")]
    string_type: Option<String>,

    /// Rust container type for repeated fields [default: Vec].
    #[arg(short = 'r', long, value_name = "TYPE")]
    repeated_type: Option<String>,

    /// Produce a groff-formatted option reference.
    #[arg(long)]
    groff: bool,

    /// Produce a bash completion script.
    #[arg(long)]
    bash: bool,
}

impl Args {
    fn options(&self) -> Options {
        Options {
            no_class: self.no_class,
            no_decoder: self.no_decoder,
            no_encoder: self.no_encoder,
            no_has_fields: self.no_has_fields,
            no_required: self.no_required,
            no_default_values: self.no_default_values,
            packed: self.packed,
            no_packed: self.no_packed,
            string_type: self.string_type.clone(),
            repeated_type: self.repeated_type.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.groff {
        print!("{}", groff_reference());
        return Ok(());
    }
    if args.bash {
        print!("{}", bash_completions());
        return Ok(());
    }
    if args.files.is_empty() {
        Args::command().print_help()?;
        return Ok(());
    }

    let options = args.options();
    let mut stdout = std::io::stdout().lock();

    for path in &args.files {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let fds: FileDescriptorSet = wirepb::decode(&bytes)
            .with_context(|| format!("decoding descriptor set {}", path.display()))?;
        let generated = generate(&options, &fds, &path.display().to_string())
            .with_context(|| format!("generating code for {}", path.display()))?;

        for warning in &generated.warnings {
            eprintln!("warning: {}: {warning}", path.display());
        }
        stdout.write_all(generated.code.as_bytes())?;
    }

    Ok(())
}

/// Render the option table as a groff man-page fragment.
fn groff_reference() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from(
        ".TH WIREPB-GEN 1\n\
         .SH NAME\n\
         wirepb-gen \\- generator of Rust code from a compiled protobuf schema\n\
         .SH SYNOPSIS\n\
         .B wirepb-gen\n\
         [OPTIONS] FILE...\n\
         .SH OPTIONS\n",
    );
    for arg in cmd.get_arguments() {
        if arg.is_positional() {
            continue;
        }
        let mut names = Vec::new();
        if let Some(short) = arg.get_short() {
            names.push(format!("\\fB\\-{short}\\fR"));
        }
        if let Some(long) = arg.get_long() {
            names.push(format!("\\fB\\-\\-{}\\fR", long.replace('-', "\\-")));
        }
        out.push_str(".TP\n");
        out.push_str(&names.join(", "));
        out.push('\n');
        if let Some(help) = arg.get_help() {
            out.push_str(&format!("{help}\n"));
        }
    }
    out
}

/// Render a minimal bash completion script covering the option names.
fn bash_completions() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut opts = Vec::new();
    for arg in cmd.get_arguments() {
        if arg.is_positional() {
            continue;
        }
        if let Some(short) = arg.get_short() {
            opts.push(format!("-{short}"));
        }
        if let Some(long) = arg.get_long() {
            opts.push(format!("--{long}"));
        }
    }

    format!(
        "_wirepb_gen() {{\n    \
             local cur=\"${{COMP_WORDS[COMP_CWORD]}}\"\n    \
             COMPREPLY=($(compgen -W \"{}\" -- \"$cur\"))\n\
         }}\n\
         complete -F _wirepb_gen -o default wirepb-gen\n",
        opts.join(" ")
    )
}
