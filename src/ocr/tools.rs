//! External tool discovery and invocation.

use std::process::Command;

use super::backend::OcrError;

/// Rasterizer binary, shipped with poppler.
pub const PDFTOPPM: &str = "pdftoppm";
/// Text recognizer binary.
pub const TESSERACT: &str = "tesseract";

/// Check if a binary is available in PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Package that provides a tool, for install hints.
pub fn package_for(tool: &str) -> &'static str {
    match tool {
        PDFTOPPM => "poppler-utils",
        TESSERACT => "tesseract-ocr",
        _ => "the missing tool",
    }
}

/// Availability of every external tool the pipeline uses.
pub fn check_tools() -> Vec<(String, bool)> {
    [PDFTOPPM, TESSERACT]
        .into_iter()
        .map(|tool| (tool.to_string(), check_binary(tool)))
        .collect()
}

/// Tools that are required but missing. Skipped stages need no tool.
pub fn missing_tools(skip_images: bool, skip_ocr: bool) -> Vec<&'static str> {
    let mut required = Vec::new();
    if !skip_images {
        required.push(PDFTOPPM);
    }
    if !skip_ocr {
        required.push(TESSERACT);
    }
    required.into_iter().filter(|tool| !check_binary(tool)).collect()
}

/// Language packs installed for tesseract, lower-case ISO 639-3 codes.
pub fn tesseract_languages() -> Result<Vec<String>, OcrError> {
    let stdout = run_tool(Command::new(TESSERACT).arg("--list-langs"), TESSERACT)?;
    // First line is a header: List of available languages in "/usr/share/...":
    Ok(String::from_utf8_lossy(&stdout)
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Run a tool to completion and return its stdout.
pub(crate) fn run_tool(command: &mut Command, tool: &str) -> Result<Vec<u8>, OcrError> {
    match command.output() {
        Ok(output) if output.status.success() => Ok(output.stdout),
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(OcrError::OcrFailed(format!("{} failed: {}", tool, stderr.trim())))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(OcrError::BackendNotAvailable(
            format!("{} not found (install {})", tool, package_for(tool)),
        )),
        Err(e) => Err(OcrError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tools_lists_every_tool() {
        let tools = check_tools();
        let names: Vec<_> = tools.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["pdftoppm", "tesseract"]);
    }

    #[test]
    fn test_nothing_missing_when_all_stages_skipped() {
        assert!(missing_tools(true, true).is_empty());
    }

    #[test]
    fn test_missing_binary_maps_to_backend_not_available() {
        let err = run_tool(
            &mut Command::new("pld-definitely-not-a-real-tool"),
            "pld-definitely-not-a-real-tool",
        )
        .unwrap_err();
        assert!(matches!(err, OcrError::BackendNotAvailable(msg) if msg.contains("not found")));
    }
}
