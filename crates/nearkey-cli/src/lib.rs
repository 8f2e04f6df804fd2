// nearkey-cli: shared utilities for CLI tools.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use memmap2::Mmap;
use nearkey_dict::Dictionary;
use nearkey_suggest::{Autocorrect, AutocorrectError, PrefixIndex};
use tracing::debug;

/// Default dictionary file name.
pub const DEFAULT_DICT_FILE: &str = "en_us.dict";

/// Environment variable naming a dictionary file or directory.
pub const DICT_PATH_ENV: &str = "NEARKEY_DICT_PATH";

/// Environment variable holding the log filter (`trace` feature only).
pub const LOG_ENV: &str = "NEARKEY_LOG";

/// A dictionary backed by a read-only memory map.
pub type MappedDictionary = Dictionary<Mmap>;

/// Search for a dictionary file.
///
/// Search order:
/// 1. `dict_path` argument (if provided)
/// 2. `NEARKEY_DICT_PATH` environment variable
/// 3. `~/.nearkey`
/// 4. `/usr/share/nearkey`
/// 5. Current working directory
///
/// Each entry may name the file itself or a directory holding
/// `en_us.dict`.
pub fn find_dictionary(dict_path: Option<&str>) -> Result<PathBuf, String> {
    let search_paths = build_search_paths(dict_path);

    for entry in &search_paths {
        if entry.is_file() {
            return Ok(entry.clone());
        }
        let candidate = entry.join(DEFAULT_DICT_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(format!(
        "could not find {} in any of the search paths:\n{}",
        DEFAULT_DICT_FILE,
        search_paths
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n")
    ))
}

/// Build the list of locations to search for the dictionary.
fn build_search_paths(dict_path: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(p) = dict_path {
        paths.push(PathBuf::from(p));
    }

    if let Ok(env_path) = std::env::var(DICT_PATH_ENV) {
        paths.push(PathBuf::from(env_path));
    }

    if let Some(home) = home_dir() {
        paths.push(home.join(".nearkey"));
    }

    paths.push(PathBuf::from("/usr/share/nearkey"));

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd);
    }

    paths
}

/// Get the user's home directory.
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// Memory-map and open a dictionary file.
pub fn open_dictionary(path: &Path) -> Result<MappedDictionary, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {}", path.display(), e))?;
    // SAFETY: the file is opened read-only and the mapping is never written.
    // The Mmap lives as long as the Dictionary that owns it. The file must
    // not be modified while a tool is running.
    let mmap = unsafe { Mmap::map(&file) }
        .map_err(|e| format!("failed to map {}: {}", path.display(), e))?;
    let dictionary = Dictionary::from_bytes(mmap)
        .map_err(|e| format!("invalid dictionary {}: {}", path.display(), e))?;
    debug!(path = %path.display(), "opened dictionary");
    Ok(dictionary)
}

/// Find, map and open the dictionary, then wrap it in an autocorrect handle.
pub fn load_handle(dict_path: Option<&str>) -> Result<Autocorrect<MappedDictionary>, String> {
    let path = find_dictionary(dict_path)?;
    Ok(Autocorrect::new(open_dictionary(&path)?))
}

/// Parse a `--dict-path=PATH` or `-d PATH` argument from command line args.
///
/// Returns `(dict_path, remaining_args)`.
pub fn parse_dict_path(args: &[String]) -> (Option<String>, Vec<String>) {
    parse_option(args, "-d", "--dict-path")
}

/// Extract one valued option (`SHORT VALUE`, `LONG VALUE` or `LONG=VALUE`).
///
/// Returns the last value given and the remaining args. Exits with an
/// error if the option is last on the line with no value.
pub fn parse_option(args: &[String], short: &str, long: &str) -> (Option<String>, Vec<String>) {
    let mut value = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;
    let long_eq = format!("{long}=");

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(val) = arg.strip_prefix(long_eq.as_str()) {
            value = Some(val.to_string());
        } else if arg == short || arg == long {
            match args.get(i + 1) {
                Some(next) => {
                    value = Some(next.clone());
                    skip_next = true;
                }
                None => fatal(&format!("{arg} requires a value")),
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (value, remaining)
}

/// Parse a numeric option value or exit with an error naming the option.
pub fn parse_number<T: std::str::FromStr>(value: &str, option: &str) -> T {
    value
        .parse()
        .unwrap_or_else(|_| fatal(&format!("invalid number for {option}: {value}")))
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

// ---------------------------------------------------------------------------
// Suggestion output
// ---------------------------------------------------------------------------

/// Write suggestions for each word: `word<TAB>best`, or with `ranked` a
/// `word:` header followed by the ranked list.
///
/// Stops at the first failing word. Everything written for earlier words
/// is flushed to `out` before the error is returned.
pub fn write_suggestions<I, S, W>(
    handle: &Autocorrect<I>,
    words: impl IntoIterator<Item = S>,
    ranked: bool,
    out: &mut W,
) -> Result<(), AutocorrectError>
where
    I: PrefixIndex,
    S: AsRef<str>,
    W: Write,
{
    for word in words {
        if let Err(e) = write_suggestion(handle, word.as_ref(), ranked, out) {
            let _ = out.flush();
            return Err(e);
        }
    }
    Ok(())
}

fn write_suggestion<I: PrefixIndex>(
    handle: &Autocorrect<I>,
    word: &str,
    ranked: bool,
    out: &mut impl Write,
) -> Result<(), AutocorrectError> {
    if !ranked {
        let best = handle.suggest(word)?;
        let _ = writeln!(out, "{word}\t{best}");
        return Ok(());
    }

    let suggestions = handle.suggestions(word)?;
    if suggestions.is_empty() {
        let _ = writeln!(out, "{word}: (no suggestions)");
    } else {
        let _ = writeln!(out, "{word}:");
        for s in &suggestions {
            let _ = writeln!(out, "  {}\tdistance={} freq={}", s.word, s.distance, s.freq);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Word lists
// ---------------------------------------------------------------------------

/// Parse a word list: one `word [frequency [ignored...]]` entry per line.
///
/// Blank lines and lines starting with `#` are skipped. A missing frequency
/// means 1; frequencies are clamped to 1..=255.
pub fn parse_word_list(text: &str) -> Result<Vec<(String, u8)>, String> {
    let mut words = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let Some(word) = fields.next() else {
            continue;
        };
        let freq = match fields.next() {
            None => 1,
            Some(f) => f
                .parse::<u64>()
                .map_err(|_| format!("line {}: invalid frequency {:?}", lineno + 1, f))?
                .clamp(1, 255) as u8,
        };
        words.push((word.to_string(), freq));
    }
    Ok(words)
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install a stderr log subscriber filtered by `NEARKEY_LOG` (default
/// `warn`).
#[cfg(feature = "trace")]
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    // A second call (or a subscriber installed by the host) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(filter)
        .try_init();
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing() {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nearkey_core::Candidate;
    use nearkey_dict::{DictError, DictionaryBuilder};
    use std::io::BufWriter;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nearkey-cli-{}-{}", name, process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn parse_dict_path_short_and_long() {
        let (path, rest) = parse_dict_path(&args(&["-d", "/tmp/x", "word"]));
        assert_eq!(path.as_deref(), Some("/tmp/x"));
        assert_eq!(rest, args(&["word"]));

        let (path, rest) = parse_dict_path(&args(&["word", "--dict-path=/opt/d"]));
        assert_eq!(path.as_deref(), Some("/opt/d"));
        assert_eq!(rest, args(&["word"]));

        let (path, rest) = parse_dict_path(&args(&["a", "b"]));
        assert_eq!(path, None);
        assert_eq!(rest, args(&["a", "b"]));
    }

    #[test]
    fn parse_option_keeps_last_value() {
        let line = args(&["-n", "3", "x", "--max-suggestions", "7"]);
        let (n, rest) = parse_option(&line, "-n", "--max-suggestions");
        assert_eq!(n.as_deref(), Some("7"));
        assert_eq!(rest, args(&["x"]));
    }

    #[test]
    fn wants_help_detects_flags() {
        assert!(wants_help(&args(&["-h"])));
        assert!(wants_help(&args(&["x", "--help"])));
        assert!(!wants_help(&args(&["x"])));
    }

    #[test]
    fn word_list_parsing() {
        let text = "# comment\n\ndoor 120\naccredit\nloud 9000 flags\nquiet 0\n  spaced   7  \n";
        let words = parse_word_list(text).unwrap();
        assert_eq!(
            words,
            vec![
                ("door".to_string(), 120),
                ("accredit".to_string(), 1),
                ("loud".to_string(), 255),
                ("quiet".to_string(), 1),
                ("spaced".to_string(), 7),
            ]
        );
    }

    #[test]
    fn word_list_rejects_bad_frequency() {
        let err = parse_word_list("door\nwindow many\n").unwrap_err();
        assert!(err.starts_with("line 2:"), "{err}");
    }

    #[test]
    fn explicit_path_is_searched_first() {
        let paths = build_search_paths(Some("/explicit"));
        assert_eq!(paths[0], PathBuf::from("/explicit"));
        assert!(paths.contains(&PathBuf::from("/usr/share/nearkey")));
    }

    #[test]
    fn finds_and_maps_dictionary_in_directory() {
        let dir = scratch_dir("find");
        let mut builder = DictionaryBuilder::new(6).unwrap().with_bloom_unit(1).unwrap();
        builder.insert("door", 120).unwrap();
        std::fs::write(dir.join(DEFAULT_DICT_FILE), builder.build().unwrap()).unwrap();

        let dir_str = dir.to_str().unwrap();
        let found = find_dictionary(Some(dir_str)).unwrap();
        assert_eq!(found, dir.join(DEFAULT_DICT_FILE));

        let handle = load_handle(Some(dir_str)).unwrap();
        assert_eq!(handle.suggest("dooe").unwrap(), "door");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn invalid_file_is_reported() {
        let dir = scratch_dir("invalid");
        let path = dir.join("broken.dict");
        std::fs::write(&path, [0u8, 1, 2]).unwrap();
        let err = open_dictionary(&path).unwrap_err();
        assert!(err.contains("invalid dictionary"), "{err}");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    /// Index that holds "door" and breaks on any lookup starting with 'p'.
    struct BrokenUnderP;

    impl PrefixIndex for BrokenUnderP {
        fn prefix_limit(&self) -> usize {
            6
        }

        fn may_contain(&self, _codes: &[u8]) -> bool {
            true
        }

        fn lookup_into(&self, codes: &[u8], out: &mut Vec<Candidate>) -> Result<(), DictError> {
            if codes.first() == Some(&b'p') {
                return Err(DictError::UnexpectedEnd { offset: 0 });
            }
            if codes == b"door" {
                out.push(Candidate::new("door", 120));
            }
            Ok(())
        }
    }

    #[test]
    fn writes_best_and_ranked_suggestions() {
        let handle = Autocorrect::new(BrokenUnderP);
        let mut out = Vec::new();
        write_suggestions(&handle, ["dooe", "qqqq"], false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "dooe\tdoor\nqqqq\tqqqq\n");

        let mut out = Vec::new();
        write_suggestions(&handle, ["door", "qqqq"], true, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "door:\n  door\tdistance=0 freq=120\nqqqq: (no suggestions)\n"
        );
    }

    #[test]
    fn earlier_results_are_flushed_when_a_word_fails() {
        let handle = Autocorrect::new(BrokenUnderP);
        let mut out = BufWriter::new(Vec::new());
        let words = vec!["dooe".to_string(), "pan".to_string(), "door".to_string()];
        let err = write_suggestions(&handle, &words, false, &mut out).unwrap_err();
        assert!(matches!(err, AutocorrectError::Dictionary(_)));
        assert!(out.buffer().is_empty());
        assert_eq!(out.get_ref().as_slice(), b"dooe\tdoor\n");
    }
}
