use std::{
    fs::OpenOptions,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::config::ConfigError;

/// Reads one ticker per line. Blank lines and `#` comments are skipped.
pub fn read_symbols_from_file(symbols_file_path: &str) -> Result<Vec<String>, ConfigError> {
    // Validate symbols file path
    let path = Path::new(symbols_file_path);
    if !path.exists() {
        return Err(ConfigError::SymbolsFile(
            symbols_file_path.into(),
            "file not found".into(),
        ));
    }

    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .map_err(|e| ConfigError::SymbolsFile(symbols_file_path.into(), e.to_string()))?;

    let mut symbols = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            ConfigError::SymbolsFile(symbols_file_path.into(), format!("line {}: {}", i + 1, e))
        })?;
        let symbol = line.trim();
        if symbol.is_empty() || symbol.starts_with('#') {
            continue;
        }
        symbols.push(symbol.to_uppercase());
    }

    if symbols.is_empty() {
        return Err(ConfigError::SymbolsFile(
            symbols_file_path.into(),
            "no symbols".into(),
        ));
    }
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_symbols_skipping_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "aapl\n\n  BRK-B \n# held for later\nQQQ").unwrap();

        let symbols = read_symbols_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(symbols, vec!["AAPL", "BRK-B", "QQQ"]);
    }

    #[test]
    fn missing_or_empty_file_is_an_error() {
        assert!(read_symbols_from_file("/definitely/not/here.txt").is_err());

        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            read_symbols_from_file(file.path().to_str().unwrap()),
            Err(ConfigError::SymbolsFile(_, _))
        ));
    }
}
