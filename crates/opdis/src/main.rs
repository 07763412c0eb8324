//! opdis - reference-driven x86 disassembler
//!
//! Usage:
//!   opdis <reference.xml> info
//!   opdis <reference.xml> decode --bytes "55 48 89 e5 c3"
//!   opdis <reference.xml> decode --file code.bin --mode e

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use opdis_disasm::{build_trie, Decoder, Instruction};
use opdis_ref::hex::hexdump;
use opdis_ref::{load_reference_str, Mode, Reference};

#[derive(Parser)]
#[command(name = "opdis")]
#[command(about = "Reference-driven x86 disassembler", long_about = None)]
struct Cli {
    /// Path to the opcode reference XML document
    reference: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show catalog statistics
    Info,
    /// Decode machine code against the reference
    Decode {
        /// Hex byte string, e.g. "55 48 89 e5"
        #[arg(short, long)]
        bytes: Option<String>,

        /// Raw binary file to decode
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Operating mode
        #[arg(short, long, value_enum, default_value_t = ModeArg::E)]
        mode: ModeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Real, protected and 64-bit
    R,
    /// Protected and 64-bit
    P,
    /// 64-bit only
    E,
    /// System management
    S,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::R => Mode::R,
            ModeArg::P => Mode::P,
            ModeArg::E => Mode::E,
            ModeArg::S => Mode::S,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let xml = fs::read_to_string(&cli.reference)
        .with_context(|| format!("reading {}", cli.reference.display()))?;
    let reference = load_reference_str(&xml)
        .with_context(|| format!("loading {}", cli.reference.display()))?;

    match cli.command {
        Commands::Info => info(&reference),
        Commands::Decode { bytes, file, mode } => {
            let code = match (bytes, file) {
                (Some(hex), None) => parse_hex_string(&hex)?,
                (None, Some(path)) => {
                    fs::read(&path).with_context(|| format!("reading {}", path.display()))?
                }
                _ => bail!("pass exactly one of --bytes or --file"),
            };
            decode(&reference, &code, mode.into())
        }
    }
}

fn info(reference: &Reference) -> Result<()> {
    println!("entries:   {}", reference.entry_count());
    println!("syntaxes:  {}", reference.syntax_count());
    println!("operands:  {}", reference.operand_count());

    let mut groups: BTreeMap<String, usize> = BTreeMap::new();
    let mut extensions: BTreeMap<String, usize> = BTreeMap::new();
    for (_, entry) in reference.entries() {
        for group in entry.groups.iter() {
            *groups.entry(format!("{group:?}")).or_default() += 1;
        }
        if let Some(ext) = entry.instruction_extension {
            *extensions.entry(format!("{ext:?}")).or_default() += 1;
        }
    }

    println!("\ngroups:");
    for (group, count) in &groups {
        println!("  {group:<10} {count}");
    }
    if !extensions.is_empty() {
        println!("\nextensions:");
        for (ext, count) in &extensions {
            println!("  {ext:<10} {count}");
        }
    }
    Ok(())
}

fn decode(reference: &Reference, code: &[u8], mode: Mode) -> Result<()> {
    let trie = build_trie(reference).context("building opcode trie")?;
    let decoder = Decoder::new(reference, &trie, mode);

    let mut offset = 0usize;
    for result in decoder.decode(code) {
        let instruction = result.with_context(|| format!("decoding at offset {offset:#x}"))?;
        print_instruction(reference, offset, code, &instruction);
        offset += instruction.length;
    }
    Ok(())
}

fn print_instruction(
    reference: &Reference,
    offset: usize,
    code: &[u8],
    instruction: &Instruction,
) {
    let raw = hexdump(&code[offset..offset + instruction.length]);
    let mnemonic = instruction.mnemonic(reference).unwrap_or("(prefix)");
    println!("{offset:#06x}:  {raw:<30} {mnemonic}");
}

fn parse_hex_string(s: &str) -> Result<Vec<u8>> {
    s.split_whitespace()
        .flat_map(|chunk| {
            // Accept both spaced pairs and longer runs like "5548".
            chunk
                .as_bytes()
                .chunks(2)
                .map(|pair| std::str::from_utf8(pair).unwrap_or(""))
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .map(|pair| {
            u8::from_str_radix(&pair, 16).with_context(|| format!("invalid hex byte {pair:?}"))
        })
        .collect()
}
