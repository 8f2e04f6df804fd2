// nearkey-suggest: Suggest corrections for typed words.
//
// Prints the best suggestion for each word, or a ranked list with -n.
// Words come from the command line, or from stdin (one per line).
//
// Usage:
//   nearkey-suggest [-d DICT_PATH] [-n N] [WORD...]
//
// Options:
//   -d, --dict-path PATH     Dictionary file or directory holding en_us.dict
//   -n, --max-suggestions N  Print up to N ranked suggestions per word
//   -h, --help               Print help

use std::io::{self, BufRead, BufWriter, Write};

fn main() {
    nearkey_cli::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (dict_path, args) = nearkey_cli::parse_dict_path(&args);
    let (max_suggestions, args) = nearkey_cli::parse_option(&args, "-n", "--max-suggestions");

    if nearkey_cli::wants_help(&args) {
        println!("nearkey-suggest: Suggest corrections for typed words.");
        println!();
        println!("Usage: nearkey-suggest [-d DICT_PATH] [-n N] [WORD...]");
        println!();
        println!("If WORD arguments are given, suggests for each word.");
        println!("Otherwise reads words from stdin (one per line).");
        println!();
        println!("Options:");
        println!("  -d, --dict-path PATH     Dictionary file or directory holding en_us.dict");
        println!("  -n, --max-suggestions N  Print up to N ranked suggestions per word");
        println!("  -h, --help               Print this help");
        return;
    }

    let max_suggestions: Option<usize> = max_suggestions
        .map(|n| nearkey_cli::parse_number(&n, "--max-suggestions"));
    let words: Vec<String> = args.iter().filter(|a| !a.starts_with('-')).cloned().collect();

    let mut handle =
        nearkey_cli::load_handle(dict_path.as_deref()).unwrap_or_else(|e| nearkey_cli::fatal(&e));
    if let Some(n) = max_suggestions {
        handle.set_max_suggestions(n);
    }

    let ranked = max_suggestions.is_some();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = if words.is_empty() {
        let stdin = io::stdin();
        let lines = stdin.lock().lines().map_while(|line| {
            line.map_err(|e| eprintln!("error reading stdin: {e}")).ok()
        });
        let inputs = lines.map(|l| l.trim().to_string()).filter(|w| !w.is_empty());
        nearkey_cli::write_suggestions(&handle, inputs, ranked, &mut out)
    } else {
        nearkey_cli::write_suggestions(&handle, &words, ranked, &mut out)
    };

    let _ = out.flush();
    if let Err(e) = result {
        nearkey_cli::fatal(&e.to_string());
    }
}
