//! Construct paths, logical ids and artifact file names.

use std::fmt;

use md5::{Digest, Md5};

use crate::dedup::Fingerprint;
use crate::error::{Error, Result};

/// Path components that are dropped entirely from unique ids.
const HIDDEN_ID: &str = "Default";

/// Path components that are kept in the hash but dropped from the readable part.
const HIDDEN_FROM_HUMAN_ID: &str = "Resource";

/// Maximum length of the readable part of a unique id.
const MAX_HUMAN_LEN: usize = 240;

/// Number of hex characters of the path hash appended to unique ids.
const HASH_LEN: usize = 8;

/// Suffix of packaged product stack templates.
const PRODUCT_TEMPLATE_SUFFIX: &str = ".product.template.json";

/// Location of a construct, e.g. `Stack/MyProduct`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructPath {
    components: Vec<String>,
}

impl ConstructPath {
    /// Start a path at a top-level construct (normally the stack).
    pub fn root(id: impl Into<String>) -> Self {
        Self {
            components: vec![id.into()],
        }
    }

    /// Path of a child construct.
    pub fn child(&self, id: impl Into<String>) -> Self {
        let mut components = self.components.clone();
        components.push(id.into());
        Self { components }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Id of the construct itself (last component).
    pub fn id(&self) -> &str {
        self.components.last().map(String::as_str).unwrap_or("")
    }

    /// Components below the root, used for ids scoped to a stack.
    pub fn below_root(&self) -> &[String] {
        self.components.get(1..).unwrap_or(&[])
    }

    /// Unique id derived from the whole path.
    pub fn unique_id(&self) -> Result<String> {
        make_unique_id(&self.components)
    }

    /// Logical id of this construct inside its root stack.
    pub fn logical_id(&self) -> Result<String> {
        make_unique_id(self.below_root())
    }
}

impl fmt::Display for ConstructPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.components.join("/"))
    }
}

/// Validate a construct id supplied by the user.
pub fn validate_construct_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::ConstructId("ids cannot be empty".to_string()));
    }
    if id.contains('/') {
        return Err(Error::ConstructId(format!(
            "'{}' contains a path separator",
            id
        )));
    }
    if !id.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::ConstructId(format!(
            "'{}' has no alphanumeric characters",
            id
        )));
    }
    Ok(())
}

/// Build a stable, readable, unique id from path components.
///
/// The readable part concatenates the alphanumeric characters of each
/// component; an 8-character MD5 of the full path keeps ids unique when two
/// paths collapse to the same readable text.
pub fn make_unique_id<S: AsRef<str>>(components: &[S]) -> Result<String> {
    let components: Vec<&str> = components
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| *c != HIDDEN_ID)
        .collect();

    match components.as_slice() {
        [] => Err(Error::ConstructId(
            "unable to calculate a unique id for an empty path".to_string(),
        )),
        [single] => Ok(remove_non_alphanumeric(single)),
        _ => {
            let hash = path_hash(&components);
            let human: String = remove_dupes(&components)
                .into_iter()
                .filter(|c| *c != HIDDEN_FROM_HUMAN_ID)
                .map(remove_non_alphanumeric)
                .collect::<String>()
                .chars()
                .take(MAX_HUMAN_LEN)
                .collect();

            Ok(format!("{}{}", human, hash))
        }
    }
}

/// Upper-case hex prefix of the MD5 of the `/`-joined path.
fn path_hash(components: &[&str]) -> String {
    let digest = Md5::digest(components.join("/").as_bytes());
    let hex = format!("{:x}", digest);
    hex[..HASH_LEN].to_uppercase()
}

/// Drop a component when the previously kept one already ends with it.
fn remove_dupes<'a>(components: &[&'a str]) -> Vec<&'a str> {
    let mut kept: Vec<&str> = Vec::with_capacity(components.len());
    for component in components {
        match kept.last() {
            Some(last) if last.ends_with(component) => {}
            _ => kept.push(component),
        }
    }
    kept
}

fn remove_non_alphanumeric(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// File name of a packaged product stack template.
pub fn product_template_file_name(path: &ConstructPath) -> Result<String> {
    Ok(format!("{}{}", path.unique_id()?, PRODUCT_TEMPLATE_SUFFIX))
}

/// File name of a staged local asset; `extension` includes the leading dot.
pub fn asset_file_name(fingerprint: &Fingerprint, extension: &str) -> String {
    format!("asset.{}{}", fingerprint, extension)
}

/// Validate and sanitize a filename by removing or replacing invalid characters.
///
/// Returns an error if the filename contains path traversal patterns.
pub fn sanitize_filename(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}
