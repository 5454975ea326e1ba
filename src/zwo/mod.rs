//! ZWO structured-workout files
//!
//! [`ZwoDocument`] is written through `quick-xml` so names and descriptions
//! are always escaped; [`block::parse_blocks`] reads block fragments back.

use std::fs;
use std::io::Write;
use std::path::Path;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};

use crate::error::{DataError, OutputError, Result};

pub mod block;

pub use block::{estimate_duration, parse_blocks, Block, BlockKind};

pub const DEFAULT_AUTHOR: &str = "Gravel God Training";
pub const SPORT_TYPE: &str = "bike";

/// Placeholder block for workouts without structure
pub const DEFAULT_BLOCKS: &str = "    <FreeRide Duration=\"60\"/>\n";

/// A complete `.zwo` workout file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZwoDocument {
    pub author: String,
    pub name: String,
    pub description: String,
    pub sport_type: String,
    pub blocks: Vec<Block>,
}

impl ZwoDocument {
    pub fn new(name: impl Into<String>, description: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            name: name.into(),
            description: description.into(),
            sport_type: SPORT_TYPE.to_string(),
            blocks,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Build from a raw block fragment, falling back to a single free ride
    /// when the fragment holds no elements
    pub fn from_fragment(name: &str, description: &str, fragment: &str) -> Result<Self> {
        let mut blocks = parse_blocks(fragment)?;
        if blocks.is_empty() {
            blocks = parse_blocks(DEFAULT_BLOCKS)?;
        }
        Ok(Self::new(name, description, blocks))
    }

    pub fn duration_seconds(&self) -> u32 {
        estimate_duration(&self.blocks)
    }

    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new("workout_file")))?;

        write_text_element(&mut writer, "author", &self.author)?;
        write_text_element(&mut writer, "name", &self.name)?;
        write_text_element(&mut writer, "description", &self.description)?;
        write_text_element(&mut writer, "sportType", &self.sport_type)?;

        writer.write_event(Event::Start(BytesStart::new("workout")))?;
        for block in &self.blocks {
            write_block(&mut writer, block)?;
        }
        writer.write_event(Event::End(BytesEnd::new("workout")))?;

        writer.write_event(Event::End(BytesEnd::new("workout_file")))?;

        let bytes = writer.into_inner();
        String::from_utf8(bytes).map_err(|err| {
            DataError::MalformedBlock {
                reason: err.to_string(),
            }
            .into()
        })
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let xml = self.to_xml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| OutputError::CreateDir {
                path: parent.to_path_buf(),
                reason: err.to_string(),
            })?;
        }
        fs::write(path, xml).map_err(|err| OutputError::WriteFailed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "wrote ZWO file");
        Ok(())
    }

    /// Parse a complete `.zwo` file
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut doc = ZwoDocument::new("", "", Vec::new());
        doc.author.clear();
        doc.sport_type.clear();

        let mut current: Option<String> = None;
        let mut workout_start: Option<usize> = None;
        let mut workout_end: Option<usize> = None;

        loop {
            let before = reader.buffer_position();
            match reader.read_event()? {
                Event::Start(e) => {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    if tag == "workout" {
                        workout_start = Some(reader.buffer_position());
                    } else if workout_start.is_none() || workout_end.is_some() {
                        current = Some(tag);
                    }
                }
                Event::End(e) => {
                    if e.name().as_ref() == b"workout" {
                        workout_end = Some(before);
                    }
                    current = None;
                }
                Event::Text(t) => {
                    if let Some(tag) = &current {
                        let text = t.unescape()?.into_owned();
                        match tag.as_str() {
                            "author" => doc.author = text,
                            "name" => doc.name = text,
                            "description" => doc.description = text,
                            "sportType" => doc.sport_type = text,
                            _ => {}
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let (Some(start), Some(end)) = (workout_start, workout_end) {
            doc.blocks = parse_blocks(&xml[start..end])?;
        }
        Ok(doc)
    }
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(value))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_block<W: Write>(writer: &mut Writer<W>, block: &Block) -> Result<()> {
    let mut start = BytesStart::new(block.kind.tag());
    for (key, value) in &block.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if block.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
    } else {
        writer.write_event(Event::Start(start))?;
        for child in &block.children {
            write_block(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(block.kind.tag())))?;
    }
    Ok(())
}

/// Workout name to filename stem: spaces and slashes become underscores,
/// `#`, `(` and `)` are dropped
pub fn clean_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '#' | '(' | ')'))
        .map(|c| if c == ' ' || c == '/' { '_' } else { c })
        .collect()
}

/// Filename for a workout, suffixed with its block option when it has one
pub fn zwo_filename(workout_name: &str, block: Option<&str>) -> String {
    let stem = clean_filename(workout_name);
    match block {
        Some(block) => format!("{}_{}.zwo", stem, block),
        None => format!("{}.zwo", stem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_layout() {
        let doc = ZwoDocument::from_fragment(
            "W01 Tue - VO2max <Intro>",
            "Hard & short",
            r#"<IntervalsT Repeat="3" OnDuration="180" OnPower="1.1" OffDuration="180" OffPower="0.55"/>"#,
        )
        .unwrap();
        let xml = doc.to_xml().unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<author>Gravel God Training</author>"));
        assert!(xml.contains("<name>W01 Tue - VO2max &lt;Intro&gt;</name>"));
        assert!(xml.contains("<description>Hard &amp; short</description>"));
        assert!(xml.contains("<sportType>bike</sportType>"));
        assert!(xml.contains(
            r#"    <IntervalsT Repeat="3" OnDuration="180" OnPower="1.1" OffDuration="180" OffPower="0.55"/>"#
        ));
    }

    #[test]
    fn test_empty_fragment_gets_free_ride() {
        let doc = ZwoDocument::from_fragment("W01 Mon - Rest", "", "   ").unwrap();
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].kind, BlockKind::FreeRide);
        assert_eq!(doc.duration_seconds(), 60);
    }

    #[test]
    fn test_parse_written_document() {
        let doc = ZwoDocument::from_fragment(
            "Level 1 - Tempo",
            "WARM-UP:\n• 15min building from Z1 to Z2 (RPE 3-4)",
            r#"<Warmup Duration="900" PowerLow="0.50" PowerHigh="0.75"/><SteadyState Duration="900" Power="0.85"/>"#,
        )
        .unwrap()
        .with_author("Coach");
        let parsed = ZwoDocument::parse(&doc.to_xml().unwrap()).unwrap();

        assert_eq!(parsed.author, "Coach");
        assert_eq!(parsed.name, "Level 1 - Tempo");
        assert!(parsed.description.contains("• 15min"));
        assert_eq!(parsed.blocks.len(), 2);
        assert_eq!(parsed.duration_seconds(), 1800);
    }

    #[test]
    fn test_filenames() {
        assert_eq!(
            clean_filename("W03 Sat - Long Ride (Z2) #2"),
            "W03_Sat_-_Long_Ride_Z2_2"
        );
        assert_eq!(clean_filename("30/30s"), "30_30s");
        assert_eq!(
            zwo_filename("W05 Tue - Mixed", Some("climbing")),
            "W05_Tue_-_Mixed_climbing.zwo"
        );
        assert_eq!(zwo_filename("W05 Tue - Mixed", None), "W05_Tue_-_Mixed.zwo");
    }
}
