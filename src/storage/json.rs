//! JSON artifact output
//!
//! An artifact is a provenance comment line followed by the document as
//! 4-space indented JSON. Output is ASCII-only: anything outside the
//! printable ASCII range is written as a `\uXXXX` escape. Floats use the
//! shortest round-trip digits with a signed exponent (`1e+16`); NaN and
//! infinities have no JSON spelling and are written as `null`.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};

use super::StorageError;
use crate::domain::{format_float, Document};

const INDENT: &[u8] = b"    ";

/// Builds the generated-file header for an artifact converted from `input`
pub fn provenance_comment(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!("/* Automatically generated from {}, do not modify. */", name)
}

/// Location of the copy kept next to the sources: `<source_dir>/<file name of output>`
pub fn source_copy_path(source_dir: &Path, output: &Path) -> Result<PathBuf, StorageError> {
    let name = output
        .file_name()
        .ok_or_else(|| StorageError::NoFileName(output.to_path_buf()))?;

    Ok(source_dir.join(name))
}

/// Renders the comment line and the document into the artifact bytes
///
/// No newline follows the closing bracket of the JSON body.
pub fn render_artifact(comment: &str, document: &Document) -> Result<Vec<u8>, StorageError> {
    let mut buf = Vec::with_capacity(comment.len() + 256);
    buf.extend_from_slice(comment.as_bytes());
    buf.push(b'\n');

    {
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, AsciiFormatter::new());
        document.serialize(&mut serializer)?;
    }

    Ok(buf)
}

/// Writes the same bytes to every path in order, truncating existing files
///
/// Stops at the first failure; earlier paths keep what was written.
pub fn write_artifact<P: AsRef<Path>>(bytes: &[u8], paths: &[P]) -> Result<(), StorageError> {
    for path in paths {
        let path = path.as_ref();
        fs::write(path, bytes).map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(())
}

/// Pretty formatter that escapes everything outside printable ASCII
struct AsciiFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl AsciiFormatter<'_> {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(INDENT),
        }
    }
}

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_f64<W: ?Sized + Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(format_float(value).as_bytes())
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut start = 0;

        for (i, ch) in fragment.char_indices() {
            if (ch as u32) <= 0x7e {
                continue;
            }

            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }

        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Number;
    use tempfile::TempDir;

    fn render(document: &Document) -> String {
        String::from_utf8(render_artifact("/* c */", document).unwrap()).unwrap()
    }

    #[test]
    fn comment_uses_input_basename() {
        assert_eq!(
            provenance_comment(Path::new("/some/where/data/shortcuts.yaml")),
            "/* Automatically generated from shortcuts.yaml, do not modify. */"
        );
    }

    #[test]
    fn source_copy_keeps_file_name() {
        let path = source_copy_path(Path::new("/src/app"), Path::new("/build/out/data.json")).unwrap();
        assert_eq!(path, PathBuf::from("/src/app/data.json"));
    }

    #[test]
    fn source_copy_requires_file_name() {
        assert!(matches!(
            source_copy_path(Path::new("/src"), Path::new("/")),
            Err(StorageError::NoFileName(_))
        ));
    }

    #[test]
    fn renders_four_space_indent() {
        let doc = Document::Mapping(vec![
            ("name".to_string(), Document::String("demo".to_string())),
            (
                "items".to_string(),
                Document::Sequence(vec![
                    Document::Number(Number::PosInt(1)),
                    Document::Number(Number::Float(2.5)),
                ]),
            ),
            ("empty".to_string(), Document::Mapping(vec![])),
        ]);

        let expected = "/* c */\n{\n    \"name\": \"demo\",\n    \"items\": [\n        1,\n        2.5\n    ],\n    \"empty\": {}\n}";
        assert_eq!(render(&doc), expected);
    }

    #[test]
    fn renders_scalars() {
        assert_eq!(render(&Document::Null), "/* c */\nnull");
        assert_eq!(render(&Document::Bool(true)), "/* c */\ntrue");
        assert_eq!(render(&Document::Number(Number::NegInt(-3))), "/* c */\n-3");
        assert_eq!(render(&Document::Sequence(vec![])), "/* c */\n[]");
    }

    #[test]
    fn escapes_non_ascii() {
        let doc = Document::String("caf\u{e9} \u{1f600} \u{7f}".to_string());
        assert_eq!(render(&doc), "/* c */\n\"caf\\u00e9 \\ud83d\\ude00 \\u007f\"");
    }

    #[test]
    fn keeps_standard_escapes() {
        let doc = Document::String("a\"b\\c\nd".to_string());
        assert_eq!(render(&doc), "/* c */\n\"a\\\"b\\\\c\\nd\"");
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(render(&Document::Number(Number::Float(f64::NAN))), "/* c */\nnull");
        assert_eq!(render(&Document::Number(Number::Float(f64::INFINITY))), "/* c */\nnull");
        assert_eq!(render(&Document::Number(Number::Float(f64::NEG_INFINITY))), "/* c */\nnull");
    }

    #[test]
    fn floats_use_signed_exponents() {
        let doc = Document::Sequence(vec![
            Document::Number(Number::Float(1e16)),
            Document::Number(Number::Float(3.0)),
            Document::Number(Number::Float(2.5e-8)),
        ]);
        assert_eq!(render(&doc), "/* c */\n[\n    1e+16,\n    3.0,\n    2.5e-08\n]");
    }

    #[test]
    fn writes_identical_bytes_everywhere() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.json");
        let second = dir.path().join("b.json");
        fs::write(&second, "stale content that is longer than the new artifact body").unwrap();

        let bytes = render_artifact("/* c */", &Document::Bool(false)).unwrap();
        write_artifact(&bytes, &[&first, &second]).unwrap();

        assert_eq!(fs::read(&first).unwrap(), bytes);
        assert_eq!(fs::read(&second).unwrap(), bytes);
    }

    #[test]
    fn write_failure_names_path() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("missing-dir").join("out.json");

        let err = write_artifact(b"x", &[&bad]).unwrap_err();
        assert!(err.to_string().contains("missing-dir"));
    }
}
