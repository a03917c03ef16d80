//! JSON document emission for reduced waveforms.

use std::io::Write;

use wt_dsp::Waveform;

/// A waveform document ready for serialization.
pub struct Document<'a> {
    /// Tool identification line; `None` omits the header key
    pub generator: Option<&'a str>,
    /// Source duration in whole seconds
    pub duration_secs: u64,
    pub waveform: &'a Waveform,
    /// Decimal places per value
    pub precision: usize,
}

/// Write the document as JSON.
///
/// One key per retained selector, in request order, after the header and
/// duration keys. Values are printed with fixed precision; consumers read
/// them as plain JSON numbers.
pub fn write_document(w: &mut impl Write, doc: &Document) -> std::io::Result<()> {
    writeln!(w, "{{")?;
    if let Some(generator) = doc.generator {
        writeln!(w, "  \"_generator\":\"{}\",", generator)?;
    }
    write!(w, "  \"duration\":{}", doc.duration_secs)?;
    for channel in &doc.waveform.channels {
        writeln!(w, ",")?;
        write!(w, "  \"{}\":[", channel.selector)?;
        for (i, value) in channel.values.iter().enumerate() {
            if i > 0 {
                write!(w, ",")?;
            }
            write!(w, "{:.*}", doc.precision, value)?;
        }
        write!(w, "]")?;
    }
    writeln!(w)?;
    writeln!(w, "}}")
}

pub fn document_to_string(doc: &Document) -> String {
    let mut buf = Vec::new();
    write_document(&mut buf, doc).expect("Vec<u8> write cannot fail");
    String::from_utf8(buf).expect("document is ASCII")
}
