// nearkey-inspect: Print the layout and statistics of a dictionary file.
//
// Usage:
//   nearkey-inspect [-d DICT_PATH] [--words]
//
// Options:
//   -d, --dict-path PATH   Dictionary file or directory holding en_us.dict
//   --words                Also list every indexed word with its frequency
//   -h, --help             Print help

use std::io::{self, BufWriter, Write};

fn main() {
    nearkey_cli::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (dict_path, args) = nearkey_cli::parse_dict_path(&args);

    if nearkey_cli::wants_help(&args) {
        println!("nearkey-inspect: Print the layout and statistics of a dictionary file.");
        println!();
        println!("Usage: nearkey-inspect [-d DICT_PATH] [--words]");
        println!();
        println!("Options:");
        println!("  -d, --dict-path PATH   Dictionary file or directory holding en_us.dict");
        println!("  --words                Also list every indexed word with its frequency");
        println!("  -h, --help             Print this help");
        return;
    }
    let list_words = args.iter().any(|a| a == "--words");

    let path = nearkey_cli::find_dictionary(dict_path.as_deref())
        .unwrap_or_else(|e| nearkey_cli::fatal(&e));
    let dict = nearkey_cli::open_dictionary(&path).unwrap_or_else(|e| nearkey_cli::fatal(&e));
    let stats = dict
        .validate()
        .unwrap_or_else(|e| nearkey_cli::fatal(&e.to_string()));

    let header = dict.header();
    let bloom = dict.bloom();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let _ = writeln!(out, "file:          {}", path.display());
    let _ = writeln!(out, "size:          {} bytes", dict.as_bytes().len());
    let _ = writeln!(out, "prefix limit:  {}", header.prefix_limit);
    let _ = writeln!(out, "bloom unit:    {} ({} bytes)", header.bloom_unit, bloom.size());
    let _ = writeln!(out, "bloom fill:    {:.4}%", bloom.fill_ratio() * 100.0);
    let _ = writeln!(out, "trie:          {} bytes", dict.as_bytes().len() - header.trie_offset());
    let _ = writeln!(out, "nodes:         {}", stats.nodes);
    let _ = writeln!(out, "edges:         {}", stats.edges);
    let _ = writeln!(out, "entries:       {}", stats.entries);
    let _ = writeln!(out, "max depth:     {}", stats.max_depth);

    if list_words {
        let _ = writeln!(out);
        let walked = dict.trie().for_each_entry(|c| {
            let _ = writeln!(out, "{}\t{}", c.word, c.freq);
        });
        if let Err(e) = walked {
            let _ = out.flush();
            nearkey_cli::fatal(&e.to_string());
        }
    }
}
