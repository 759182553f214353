// src/manifest.rs

//! Watch face format version lookup in the merged manifest.
//!
//! The version is declared as
//!
//! ```xml
//! <property
//!     android:name="com.google.wear.watchface.format.version"
//!     android:value="2" />
//! ```
//!
//! and is read once per run. There is no fallback version. Attributes are
//! matched by namespace, so any prefix bound to the Android namespace works.

use std::fmt;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use tracing::debug;

use crate::errors::{Result, WffError};
use crate::fs::FileSystem;

/// `android:name` of the property holding the format version.
pub const FORMAT_VERSION_PROPERTY: &str = "com.google.wear.watchface.format.version";

const ANDROID_NS: &[u8] = b"http://schemas.android.com/apk/res/android";
const PROPERTY_ELEMENT: &[u8] = b"property";
const NAME_ATTR: &[u8] = b"name";
const VALUE_ATTR: &[u8] = b"value";

/// Watch face format version passed to the external tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToolVersion(pub u32);

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Read `path` and extract the format version.
pub fn resolve_version(fs: &dyn FileSystem, path: &Path) -> Result<ToolVersion> {
    let xml = fs.read_to_string(path).map_err(|e| malformed(path, format!("{e:#}")))?;
    let version = parse_version(&xml).map_err(|reason| malformed(path, reason))?;
    debug!(?path, %version, "resolved watch face format version");
    Ok(version)
}

/// Extract the format version from manifest XML.
pub fn parse_version(xml: &str) -> std::result::Result<ToolVersion, String> {
    let mut reader = NsReader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == PROPERTY_ELEMENT =>
            {
                if let Some(value) = version_property_value(&reader, &e)? {
                    return value
                        .trim()
                        .parse::<u32>()
                        .map(ToolVersion)
                        .map_err(|_| format!("format version '{value}' is not a number"));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "XML error at byte {}: {e}",
                    reader.buffer_position()
                ));
            }
        }
    }

    Err(format!("no <property android:name=\"{FORMAT_VERSION_PROPERTY}\"> found"))
}

/// `Some(value)` if this `<property>` is the format-version one.
fn version_property_value(
    reader: &NsReader<&[u8]>,
    e: &BytesStart<'_>,
) -> std::result::Result<Option<String>, String> {
    let mut name = None;
    let mut value = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|err| format!("bad attribute: {err}"))?;
        let (ns, local) = reader.resolve_attribute(attr.key);
        if !matches!(ns, ResolveResult::Bound(Namespace(uri)) if uri == ANDROID_NS) {
            continue;
        }
        let text = attr
            .unescape_value()
            .map_err(|err| format!("bad attribute value: {err}"))?
            .into_owned();
        match local.as_ref() {
            NAME_ATTR => name = Some(text),
            VALUE_ATTR => value = Some(text),
            _ => {}
        }
    }

    if name.as_deref() != Some(FORMAT_VERSION_PROPERTY) {
        return Ok(None);
    }
    value
        .map(Some)
        .ok_or_else(|| "format version property has no android:value".to_string())
}

fn malformed(path: &Path, reason: String) -> WffError {
    WffError::MalformedDescriptor {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn manifest(property: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android" package="com.example.face">
    <uses-feature android:name="android.hardware.type.watch" />
    <application android:label="Face" android:hasCode="false">
        {property}
    </application>
</manifest>"#
        )
    }

    #[test]
    fn reads_version_five() {
        let xml = manifest(
            r#"<property android:name="com.google.wear.watchface.format.version" android:value="5" />"#,
        );
        assert_eq!(parse_version(&xml), Ok(ToolVersion(5)));
    }

    #[test]
    fn ignores_unrelated_properties() {
        let xml = manifest(
            r#"<property android:name="other" android:value="9" />
               <property android:value="1" android:name="com.google.wear.watchface.format.version"></property>"#,
        );
        assert_eq!(parse_version(&xml), Ok(ToolVersion(1)));
    }

    #[test]
    fn missing_property_is_malformed() {
        let fs = MockFileSystem::new();
        fs.add_file("/m/AndroidManifest.xml", manifest("").into_bytes());

        let err = resolve_version(&fs, Path::new("/m/AndroidManifest.xml")).unwrap_err();
        assert!(matches!(err, WffError::MalformedDescriptor { .. }));
    }

    #[test]
    fn any_prefix_bound_to_android_namespace_is_accepted() {
        let xml = r#"<manifest xmlns:a="http://schemas.android.com/apk/res/android">
    <application>
        <property a:name="com.google.wear.watchface.format.version" a:value="4" />
    </application>
</manifest>"#;
        assert_eq!(parse_version(xml), Ok(ToolVersion(4)));
    }

    #[test]
    fn android_prefix_without_namespace_binding_is_not_matched() {
        let xml = r#"<manifest xmlns:android="urn:something-else">
    <property android:name="com.google.wear.watchface.format.version" android:value="4" />
</manifest>"#;
        assert!(parse_version(xml).is_err());
    }

    #[test]
    fn non_numeric_value_is_malformed() {
        let xml = manifest(
            r#"<property android:name="com.google.wear.watchface.format.version" android:value="two" />"#,
        );
        let reason = parse_version(&xml).unwrap_err();
        assert!(reason.contains("two"));
    }

    #[test]
    fn missing_value_attribute_is_malformed() {
        let xml = manifest(
            r#"<property android:name="com.google.wear.watchface.format.version" />"#,
        );
        assert!(parse_version(&xml).is_err());
    }

    #[test]
    fn unreadable_manifest_is_malformed() {
        let fs = MockFileSystem::new();
        let err = resolve_version(&fs, Path::new("/nope.xml")).unwrap_err();
        assert!(matches!(err, WffError::MalformedDescriptor { .. }));
    }
}
