use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// ZWO element kinds the pipeline understands; anything else is carried through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Warmup,
    Cooldown,
    SteadyState,
    IntervalsT,
    FreeRide,
    Ramp,
    Other(String),
}

impl BlockKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Warmup" => BlockKind::Warmup,
            "Cooldown" => BlockKind::Cooldown,
            "SteadyState" => BlockKind::SteadyState,
            "IntervalsT" => BlockKind::IntervalsT,
            "FreeRide" => BlockKind::FreeRide,
            "Ramp" => BlockKind::Ramp,
            other => BlockKind::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            BlockKind::Warmup => "Warmup",
            BlockKind::Cooldown => "Cooldown",
            BlockKind::SteadyState => "SteadyState",
            BlockKind::IntervalsT => "IntervalsT",
            BlockKind::FreeRide => "FreeRide",
            BlockKind::Ramp => "Ramp",
            BlockKind::Other(tag) => tag,
        }
    }
}

/// One workout element with its attributes in document order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub attributes: Vec<(String, String)>,
    /// Nested elements such as `<textevent>`
    pub children: Vec<Block>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        self.attr(key).and_then(|v| v.trim().parse().ok())
    }

    pub fn attr_u32(&self, key: &str) -> Option<u32> {
        self.attr(key).and_then(|v| {
            let v = v.trim();
            v.parse::<u32>()
                .ok()
                .or_else(|| v.parse::<f64>().ok().map(|f| f.max(0.0) as u32))
        })
    }

    pub fn duration(&self) -> u32 {
        self.attr_u32("Duration").unwrap_or(0)
    }

    /// Seconds this block contributes to the workout
    pub fn total_seconds(&self) -> u32 {
        match self.kind {
            BlockKind::IntervalsT => {
                let reps = self.attr_u32("Repeat").unwrap_or(1);
                let on = self.attr_u32("OnDuration").unwrap_or(0);
                let off = self.attr_u32("OffDuration").unwrap_or(0);
                reps.saturating_mul(on.saturating_add(off))
            }
            _ => self.duration(),
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut block = Block::new(BlockKind::from_tag(&name));
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            block.attributes.push((key, value));
        }
        Ok(block)
    }
}

/// Parse a fragment of workout elements, e.g. the contents of `<workout>`
pub fn parse_blocks(xml: &str) -> Result<Vec<Block>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut roots = Vec::new();
    let mut stack: Vec<Block> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(Block::from_start(&e)?),
            Event::Empty(e) => {
                let block = Block::from_start(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(block),
                    None => roots.push(block),
                }
            }
            Event::End(_) => {
                let block = stack.pop().ok_or_else(|| DataError::MalformedBlock {
                    reason: "closing tag without opening tag".to_string(),
                })?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(block),
                    None => roots.push(block),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DataError::MalformedBlock {
            reason: format!("unclosed <{}>", open.kind.tag()),
        }
        .into());
    }

    Ok(roots)
}

/// Total planned seconds across blocks, counting every interval repeat.
/// Saturates at `u32::MAX` for absurd attribute values.
pub fn estimate_duration(blocks: &[Block]) -> u32 {
    blocks
        .iter()
        .map(Block::total_seconds)
        .fold(0, u32::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment() {
        let xml = r#"
    <Warmup Duration="900" PowerLow="0.50" PowerHigh="0.75"/>
    <IntervalsT Repeat="5" OnDuration="180" OnPower="1.1" OffDuration="180" OffPower="0.55"/>
    <Cooldown Duration="600" PowerLow="0.50" PowerHigh="0.65"/>"#;
        let blocks = parse_blocks(xml).unwrap();

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].kind, BlockKind::Warmup);
        assert_eq!(blocks[1].attr_f64("OnPower"), Some(1.1));
        assert_eq!(blocks[1].total_seconds(), 1800);
        assert_eq!(estimate_duration(&blocks), 900 + 1800 + 600);
    }

    #[test]
    fn test_nested_text_events() {
        let xml = r#"<SteadyState Duration="600" Power="0.9"><textevent timeoffset="0" message="Settle in &amp; breathe"/></SteadyState><FreeRide Duration="60"/>"#;
        let blocks = parse_blocks(xml).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].children.len(), 1);
        assert_eq!(blocks[0].children[0].attr("message"), Some("Settle in & breathe"));
        assert_eq!(blocks[1].kind, BlockKind::FreeRide);
    }

    #[test]
    fn test_unclosed_element_is_malformed() {
        let err = parse_blocks(r#"<SteadyState Duration="600">"#).unwrap_err();
        assert!(err.to_string().contains("unclosed"));
    }

    #[test]
    fn test_empty_fragment() {
        assert!(parse_blocks("").unwrap().is_empty());
        assert_eq!(estimate_duration(&[]), 0);
    }

    #[test]
    fn test_duration_saturates() {
        let blocks = parse_blocks(
            r#"<IntervalsT Repeat="100000" OnDuration="60000" OffDuration="1"/>
<SteadyState Duration="4000000000" Power="0.6"/>"#,
        )
        .unwrap();
        assert_eq!(blocks[0].total_seconds(), u32::MAX);
        assert_eq!(estimate_duration(&blocks), u32::MAX);
    }
}
