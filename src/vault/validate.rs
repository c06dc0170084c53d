// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Input validation: content-type allow-list, filename sanitization,
//! and the field checks applied before any record is written.

use std::path::Path;

use super::error::{VaultError, VaultResult};

/// Allow-list of acceptable upload content types. Everything else is
/// rejected (default deny).
const ALLOWED_CONTENT_TYPES: &[&str] = &[
    // Documents
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    // Text
    "text/plain",
    "text/csv",
    "text/markdown",
    "application/json",
    "application/xml",
    "text/xml",
    // Images
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    // Archives
    "application/zip",
    "application/x-zip-compressed",
    "application/gzip",
    "application/x-tar",
];

/// Maximum filename length in bytes (common filesystem limit).
const MAX_FILENAME_BYTES: usize = 255;

/// Check a content type against the allow-list.
///
/// Parameters after `;` (charset etc.) are stripped before the
/// case-insensitive comparison.
pub fn validate_content_type(content_type: &str) -> VaultResult<()> {
    let base = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if ALLOWED_CONTENT_TYPES.contains(&base.as_str()) {
        Ok(())
    } else {
        Err(VaultError::validation(format!(
            "content type not allowed: {content_type}"
        )))
    }
}

/// Sanitize a filename, defeating path traversal.
///
/// Collapses the name to its final path component, strips remaining
/// separators and null bytes, trims whitespace, and rejects anything
/// that collapses to empty, `.` or `..`. Names over 255 bytes are
/// truncated with the extension kept intact.
pub fn sanitize_filename(filename: &str) -> VaultResult<String> {
    if filename.is_empty() {
        return Err(VaultError::validation("filename must not be empty"));
    }

    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let cleaned: String = base
        .chars()
        .filter(|c| *c != '/' && *c != '\\' && *c != '\0')
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return Err(VaultError::validation("invalid filename"));
    }

    if cleaned.len() > MAX_FILENAME_BYTES {
        let ext_len = Path::new(cleaned)
            .extension()
            .map(|e| e.len() + 1)
            .unwrap_or(0);
        if ext_len >= MAX_FILENAME_BYTES {
            return Err(VaultError::validation("invalid filename"));
        }
        let mut cut = MAX_FILENAME_BYTES - ext_len;
        // Back off to a char boundary so the truncation cannot split a
        // multi-byte character.
        while cut > 0 && !cleaned.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            return Err(VaultError::validation("invalid filename"));
        }
        let ext = &cleaned[cleaned.len() - ext_len..];
        return Ok(format!("{}{}", &cleaned[..cut], ext));
    }

    Ok(cleaned.to_string())
}

/// Check an upload size against the configured limit. Zero-byte and
/// oversize uploads are both rejected.
pub fn validate_file_size(size: u64, max_size: u64) -> VaultResult<()> {
    if size == 0 {
        return Err(VaultError::validation("file is empty"));
    }
    if size > max_size {
        return Err(VaultError::validation(format!(
            "file exceeds maximum size of {max_size} bytes"
        )));
    }
    Ok(())
}

/// Validate an email address and return it lowercased.
///
/// Deliberately shallow: one `@`, non-empty local part, domain with a
/// dot, no whitespace or path-hostile bytes. The address doubles as the
/// uniqueness-index file name, so separators and null bytes must not
/// survive.
pub fn validate_email(email: &str) -> VaultResult<String> {
    let email = email.trim().to_ascii_lowercase();

    let Some((local, domain)) = email.split_once('@') else {
        return Err(VaultError::validation("invalid email address"));
    };

    // The separating `@` is already consumed by the split, so any that
    // remains in either part marks a malformed address.
    let hostile = |c: char| c.is_whitespace() || c == '/' || c == '\\' || c == '\0' || c == '@';
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || local.chars().any(hostile)
        || domain.chars().any(hostile)
    {
        return Err(VaultError::validation("invalid email address"));
    }

    Ok(email)
}

/// Passwords must be at least 8 characters.
pub fn validate_password(password: &str) -> VaultResult<()> {
    if password.chars().count() < 8 {
        return Err(VaultError::validation(
            "password must be at least 8 characters",
        ));
    }
    Ok(())
}

/// Display names must be at least 2 characters after trimming.
pub fn validate_display_name(name: &str) -> VaultResult<String> {
    let name = name.trim();
    if name.chars().count() < 2 {
        return Err(VaultError::validation(
            "name must be at least 2 characters",
        ));
    }
    Ok(name.to_string())
}
