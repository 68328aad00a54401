/// huff – compress text files with a Huffman code and a separate codebook.
///
///   huff notes.txt                  → notes.bin + notes.csv
///   huff -d notes.bin               → notes_decompressed.txt (reads notes.csv)
///   huff -d -b book.csv -o out.txt packed.bin
///   huff -v notes.txt               → also report ratio and entropy
use std::env;
use std::path::{Path, PathBuf};
use std::process::{self, ExitCode};

use huffman_text::files::{self, FileOptions};
use log::LevelFilter;

fn usage() {
    eprintln!("huff - Huffman text compression");
    eprintln!();
    eprintln!("Usage: huff [OPTIONS] FILE...");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -d, --decompress     Decompress FILE (a payload) using its codebook");
    eprintln!("  -b, --codebook PATH  Codebook to write (compress) or read (decompress)");
    eprintln!("  -o, --output PATH    Output file (single FILE only)");
    eprintln!("  -f, --force          Overwrite existing output files");
    eprintln!("  -v, --verbose        Verbose output (repeat for debug logging)");
    eprintln!("  -q, --quiet          Only report errors");
    eprintln!("  -V, --version        Print version and exit");
    eprintln!("  -h, --help           Show this help");
    eprintln!();
    eprintln!("Compressing NAME.txt writes NAME.bin and the codebook NAME.csv.");
    eprintln!("Decompressing NAME.bin reads NAME.csv and writes NAME_decompressed.txt.");
    eprintln!("Trailing whitespace is not preserved. RUST_LOG overrides -v/-q.");
}

#[derive(Debug, Default)]
struct Opts {
    decompress: bool,
    codebook: Option<PathBuf>,
    output: Option<PathBuf>,
    force: bool,
    verbose: u8,
    quiet: bool,
    files: Vec<PathBuf>,
}

impl Opts {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn file_options(&self) -> FileOptions {
        FileOptions {
            output: self.output.clone(),
            codebook: self.codebook.clone(),
            force: self.force,
        }
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("huff: {msg}");
    process::exit(1);
}

fn parse_args() -> Opts {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut opts = Opts::default();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-d" | "--decompress" => opts.decompress = true,
            "-f" | "--force" => opts.force = true,
            "-v" | "--verbose" => opts.verbose = opts.verbose.saturating_add(1),
            "-q" | "--quiet" => opts.quiet = true,
            "-h" | "--help" => {
                usage();
                process::exit(0);
            }
            "-V" | "--version" => {
                println!("huff {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "-b" | "--codebook" | "-o" | "--output" => {
                i += 1;
                let Some(value) = args.get(i) else {
                    fail(&format!("missing argument for {arg}"));
                };
                let value = Some(PathBuf::from(value));
                if matches!(arg.as_str(), "-b" | "--codebook") {
                    opts.codebook = value;
                } else {
                    opts.output = value;
                }
            }
            // combined short flags like -dv, -vvf
            s if s.starts_with('-') && !s.starts_with("--") && s.len() > 2 => {
                for ch in s[1..].chars() {
                    match ch {
                        'd' => opts.decompress = true,
                        'f' => opts.force = true,
                        'v' => opts.verbose = opts.verbose.saturating_add(1),
                        'q' => opts.quiet = true,
                        _ => fail(&format!("unknown flag '-{ch}'")),
                    }
                }
            }
            s if s.starts_with('-') && s.len() > 1 => fail(&format!("unknown option '{s}'")),
            _ => opts.files.push(PathBuf::from(arg)),
        }
        i += 1;
    }

    opts
}

fn process_compress(opts: &Opts, path: &Path) -> Result<(), String> {
    let report = files::compress_file(path, &opts.file_options())
        .map_err(|e| format!("{}: {e}", path.display()))?;

    log::info!(
        "{}: {} symbols, {} distinct, {:.3} bits/symbol entropy",
        path.display(),
        report.symbols,
        report.codebook_entries,
        report.entropy
    );
    log::info!(
        "{}: {} → {} bytes ({:.1}%)",
        path.display(),
        report.input_bytes,
        report.payload_bytes,
        report.ratio() * 100.0
    );
    Ok(())
}

fn process_decompress(opts: &Opts, path: &Path) -> Result<(), String> {
    let output = files::decompress_file(path, &opts.file_options())
        .map_err(|e| format!("{}: {e}", path.display()))?;
    log::info!("{}: wrote {}", path.display(), output.display());
    Ok(())
}

fn run() -> Result<(), ()> {
    let opts = parse_args();

    env_logger::Builder::new()
        .filter_level(opts.log_level())
        .format_timestamp(None)
        .parse_default_env()
        .init();

    if opts.files.is_empty() {
        usage();
        return Err(());
    }
    if opts.files.len() > 1 && (opts.output.is_some() || opts.codebook.is_some()) {
        eprintln!("huff: -o and -b need exactly one FILE");
        return Err(());
    }

    let mut had_error = false;
    for path in &opts.files {
        let result = if opts.decompress {
            process_decompress(&opts, path)
        } else {
            process_compress(&opts, path)
        };

        if let Err(e) = result {
            eprintln!("huff: {e}");
            had_error = true;
        }
    }

    if had_error {
        Err(())
    } else {
        Ok(())
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}
