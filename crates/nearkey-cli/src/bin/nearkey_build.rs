// nearkey-build: Compile a word list into a dictionary file.
//
// Input is one `word [frequency]` entry per line; `#` starts a comment
// line, a missing frequency means 1 and frequencies are clamped to 1..=255.
// Further fields on a line are ignored. The compiled blob is re-opened and
// fully validated before it is written.
//
// Usage:
//   nearkey-build [-p PREFIX_LIMIT] [-b BLOOM_UNIT] -o OUT WORDLIST
//
// Options:
//   -p, --prefix-limit N   Indexed leading characters (default: 6)
//   -b, --bloom-unit N     Bloom filter size in 64 KiB units, a power of two (default: 8)
//   -o, --output PATH      Output dictionary file
//   -h, --help             Print help

use nearkey_dict::builder::{DEFAULT_BLOOM_UNIT, DEFAULT_PREFIX_LIMIT};
use nearkey_dict::{Dictionary, DictionaryBuilder};

fn main() {
    nearkey_cli::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (prefix_limit, args) = nearkey_cli::parse_option(&args, "-p", "--prefix-limit");
    let (bloom_unit, args) = nearkey_cli::parse_option(&args, "-b", "--bloom-unit");
    let (output, args) = nearkey_cli::parse_option(&args, "-o", "--output");

    if nearkey_cli::wants_help(&args) {
        println!("nearkey-build: Compile a word list into a dictionary file.");
        println!();
        println!("Usage: nearkey-build [-p PREFIX_LIMIT] [-b BLOOM_UNIT] -o OUT WORDLIST");
        println!();
        println!("WORDLIST holds one `word [frequency]` entry per line.");
        println!();
        println!("Options:");
        println!("  -p, --prefix-limit N   Indexed leading characters (default: {DEFAULT_PREFIX_LIMIT})");
        println!("  -b, --bloom-unit N     Bloom filter size in 64 KiB units (default: {DEFAULT_BLOOM_UNIT})");
        println!("  -o, --output PATH      Output dictionary file");
        println!("  -h, --help             Print this help");
        return;
    }

    let prefix_limit: u8 = prefix_limit
        .map(|v| nearkey_cli::parse_number(&v, "--prefix-limit"))
        .unwrap_or(DEFAULT_PREFIX_LIMIT);
    let bloom_unit: u8 = bloom_unit
        .map(|v| nearkey_cli::parse_number(&v, "--bloom-unit"))
        .unwrap_or(DEFAULT_BLOOM_UNIT);
    let output = output.unwrap_or_else(|| nearkey_cli::fatal("--output is required"));
    let input = match args.as_slice() {
        [path] => path,
        [] => nearkey_cli::fatal("missing WORDLIST argument"),
        _ => nearkey_cli::fatal("expected exactly one WORDLIST argument"),
    };

    let text = std::fs::read_to_string(input)
        .unwrap_or_else(|e| nearkey_cli::fatal(&format!("failed to read {input}: {e}")));
    let words = nearkey_cli::parse_word_list(&text)
        .unwrap_or_else(|e| nearkey_cli::fatal(&format!("{input}: {e}")));

    let mut builder = DictionaryBuilder::new(prefix_limit)
        .and_then(|b| b.with_bloom_unit(bloom_unit))
        .unwrap_or_else(|e| nearkey_cli::fatal(&e.to_string()));
    for (word, freq) in &words {
        builder
            .insert(word, *freq)
            .unwrap_or_else(|e| nearkey_cli::fatal(&e.to_string()));
    }
    let blob = builder
        .build()
        .unwrap_or_else(|e| nearkey_cli::fatal(&e.to_string()));

    let stats = Dictionary::from_bytes(blob.as_slice())
        .and_then(|d| d.validate())
        .unwrap_or_else(|e| nearkey_cli::fatal(&format!("compiled dictionary is invalid: {e}")));

    std::fs::write(&output, &blob)
        .unwrap_or_else(|e| nearkey_cli::fatal(&format!("failed to write {output}: {e}")));

    println!(
        "{output}: {} words, {} entries, {} nodes, {} bytes",
        words.len(),
        stats.entries,
        stats.nodes,
        blob.len()
    );
}
