use std::error::Error;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use legato::vocab::SpecialTokenMap;
use legato::{Segmenter, Vocabulary};

use clap::Parser;

#[derive(Clone, Debug)]
enum VocabFormat {
    Model,
    Flat,
    Json,
}

impl FromStr for VocabFormat {
    type Err = &'static str;
    fn from_str(format: &str) -> Result<Self, Self::Err> {
        match format {
            "model" => Ok(Self::Model),
            "flat" => Ok(Self::Flat),
            "json" => Ok(Self::Json),
            _ => Err("Could not parse a format"),
        }
    }
}

#[derive(Clone, Debug)]
enum OutputMode {
    Plain,
    Pieces,
    Detail,
}

impl FromStr for OutputMode {
    type Err = &'static str;
    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "plain" => Ok(Self::Plain),
            "pieces" => Ok(Self::Pieces),
            "detail" => Ok(Self::Detail),
            _ => Err("Could not parse a mode"),
        }
    }
}

#[derive(Parser, Debug)]
#[clap(name = "tokenize", about = "Segments text into subword pieces")]
struct Args {
    /// Vocabulary file.
    #[clap(short = 'i', long)]
    vocab: PathBuf,

    /// Vocabulary format. Choices are model, flat, and json.
    #[clap(short = 'f', long, default_value = "model")]
    format: VocabFormat,

    /// Special-token mapping file (in JSON).
    #[clap(short = 's', long)]
    special_tokens: Option<PathBuf>,

    /// Number of <extra_id_N> sentinels to append to the vocabulary.
    #[clap(short = 'e', long)]
    extra_ids: Option<u32>,

    /// Output mode. Choices are plain, pieces, and detail.
    #[clap(short = 'O', long, default_value = "plain")]
    output_mode: OutputMode,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args = Args::parse();

    eprintln!("Loading the vocabulary...");
    let mut vocab = match args.format {
        VocabFormat::Model => Vocabulary::from_model_file(&args.vocab)?,
        VocabFormat::Flat => Vocabulary::from_flat_file(&args.vocab)?,
        VocabFormat::Json => Vocabulary::from_json_file(&args.vocab)?,
    };
    if let Some(path) = &args.special_tokens {
        vocab = vocab.with_special_tokens(SpecialTokenMap::from_file(path)?)?;
    }
    if let Some(n) = args.extra_ids {
        vocab.add_extra_ids(n)?;
    }

    let segmenter = Segmenter::new(vocab);
    let mut worker = segmenter.new_worker();

    eprintln!("Ready to segment");

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let lines = std::io::stdin().lock().lines();
    for line in lines {
        let line = line?;
        if line.is_empty() {
            out.write_all(b"EOS\n")?;
            if is_tty {
                out.flush()?;
            }
            continue;
        }
        worker.reset_span(line);
        worker.segment()?;
        match args.output_mode {
            OutputMode::Plain => {
                for i in 0..worker.num_tokens() {
                    if i != 0 {
                        out.write_all(b" ")?;
                    }
                    out.write_all(worker.token(i).surface().as_bytes())?;
                }
                out.write_all(b"\n")?;
                if is_tty {
                    out.flush()?;
                }
            }
            OutputMode::Pieces => {
                for i in 0..worker.num_tokens() {
                    let t = worker.token(i);
                    writeln!(&mut out, "{}\t{}", t.surface(), t.piece_id())?;
                }
                out.write_all(b"EOS\n")?;
                if is_tty {
                    out.flush()?;
                }
            }
            OutputMode::Detail => {
                for i in 0..worker.num_tokens() {
                    let t = worker.token(i);
                    writeln!(
                        &mut out,
                        "{}\tpiece_id={}\tmask={:?}\ttotal_score={}\trange_char={:?}",
                        t.surface(),
                        t.piece_id(),
                        t.mask(),
                        t.total_score(),
                        t.range_char(),
                    )?;
                }
                out.write_all(b"EOS\n")?;
                if is_tty {
                    out.flush()?;
                }
            }
        }
    }

    Ok(())
}
