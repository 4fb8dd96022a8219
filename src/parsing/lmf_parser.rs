use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{AnimacyError, Result};
use crate::lexicon::sense_graph::{normalize_key, SenseGraph};
use crate::types::lexicon_data::SenseInfo;

const PRIMARY_LABEL: &str = "primary";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LexiconStats {
    pub entries: usize,
    pub senses: usize,
    pub primary_edges: usize,
    pub skipped_entries: usize,
    pub skipped_senses: usize,
}

#[derive(Debug, Default)]
pub struct ParsedLexicon {
    pub graph: SenseGraph,
    pub stats: LexiconStats,
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum Element {
    LexicalEntry,
    Lemma,
    FormRepresentation,
    Sense,
    SenseRelation,
    Feat,
    Other,
}

impl Element {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"LexicalEntry" => Element::LexicalEntry,
            b"Lemma" => Element::Lemma,
            b"FormRepresentation" => Element::FormRepresentation,
            b"Sense" => Element::Sense,
            b"SenseRelation" => Element::SenseRelation,
            b"feat" => Element::Feat,
            _ => Element::Other,
        }
    }
}

#[derive(Debug, Default)]
struct FormFeats {
    written_form: Option<String>,
    part_of_speech: Option<String>,
    lemgram: Option<String>,
}

#[derive(Debug, Default)]
struct RelationDraft {
    targets: String,
    label: Option<String>,
}

#[derive(Debug, Default)]
struct SenseDraft {
    id: Option<String>,
    relations: Vec<RelationDraft>,
}

#[derive(Debug, Default)]
struct EntryDraft {
    form: Option<FormFeats>,
    reading_form: bool,
    senses: Vec<SenseDraft>,
}

fn attr_value(element: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

struct LmfBuilder {
    stack: Vec<Element>,
    entry: Option<EntryDraft>,
    parsed: ParsedLexicon,
}

impl LmfBuilder {
    fn new() -> Self {
        LmfBuilder {
            stack: Vec::new(),
            entry: None,
            parsed: ParsedLexicon::default(),
        }
    }

    fn parent(&self, depth: usize) -> Element {
        self.stack
            .len()
            .checked_sub(depth)
            .and_then(|i| self.stack.get(i))
            .copied()
            .unwrap_or(Element::Other)
    }

    fn open(&mut self, element: Element, start: &BytesStart) -> Result<()> {
        let parent = self.parent(1);
        match element {
            Element::LexicalEntry => {
                self.parsed.stats.entries += 1;
                self.entry = Some(EntryDraft::default());
            }
            Element::FormRepresentation
                if parent == Element::Lemma && self.parent(2) == Element::LexicalEntry =>
            {
                if let Some(entry) = self.entry.as_mut() {
                    // Only the first form representation of an entry counts.
                    if entry.form.is_none() {
                        entry.form = Some(FormFeats::default());
                        entry.reading_form = true;
                    }
                }
            }
            Element::Sense if parent == Element::LexicalEntry => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.senses.push(SenseDraft {
                        id: attr_value(start, b"id")?,
                        relations: Vec::new(),
                    });
                }
            }
            Element::SenseRelation if parent == Element::Sense => {
                let targets = attr_value(start, b"targets")?.unwrap_or_default();
                if let Some(sense) = self.entry.as_mut().and_then(|e| e.senses.last_mut()) {
                    sense.relations.push(RelationDraft {
                        targets,
                        label: None,
                    });
                }
            }
            Element::Feat => self.open_feat(parent, start)?,
            _ => {}
        }
        Ok(())
    }

    fn open_feat(&mut self, parent: Element, start: &BytesStart) -> Result<()> {
        let Some(entry) = self.entry.as_mut() else {
            return Ok(());
        };
        match parent {
            Element::FormRepresentation if entry.reading_form => {
                let att = attr_value(start, b"att")?;
                let val = attr_value(start, b"val")?;
                if let (Some(form), Some(att)) = (entry.form.as_mut(), att) {
                    let slot = match att.as_str() {
                        "writtenForm" => &mut form.written_form,
                        "partOfSpeech" => &mut form.part_of_speech,
                        "lemgram" => &mut form.lemgram,
                        _ => return Ok(()),
                    };
                    if slot.is_none() {
                        *slot = Some(val.unwrap_or_default());
                    }
                }
            }
            Element::SenseRelation => {
                if let Some(relation) = entry
                    .senses
                    .last_mut()
                    .and_then(|s| s.relations.last_mut())
                {
                    if relation.label.is_none() && attr_value(start, b"att")?.as_deref() == Some("label") {
                        relation.label = Some(attr_value(start, b"val")?.unwrap_or_default());
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, element: Element) {
        match element {
            Element::FormRepresentation => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.reading_form = false;
                }
            }
            Element::LexicalEntry => {
                if let Some(entry) = self.entry.take() {
                    self.commit(entry);
                }
            }
            _ => {}
        }
    }

    fn commit(&mut self, entry: EntryDraft) {
        let stats = &mut self.parsed.stats;
        let graph = &mut self.parsed.graph;
        let Some(form) = entry.form else {
            stats.skipped_entries += 1;
            tracing::debug!("skipping lexical entry without a form representation");
            return;
        };

        let written_form = normalize_key(form.written_form.as_deref().unwrap_or(""));
        let pos = form.part_of_speech.unwrap_or_default();
        let lemgram = normalize_key(form.lemgram.as_deref().unwrap_or(""));
        graph.declare_lemgram(&lemgram, &written_form);

        for sense in entry.senses {
            let sense_key = sense.id.as_deref().map(normalize_key).unwrap_or_default();
            if sense_key.is_empty() {
                stats.skipped_senses += 1;
                tracing::debug!(written_form = %written_form, "skipping sense without id");
                continue;
            }
            let sense_id = graph.add_sense(
                &sense_key,
                SenseInfo {
                    written_form: written_form.clone(),
                    pos: pos.clone(),
                    lemgram: lemgram.clone(),
                },
            );
            stats.senses += 1;

            for relation in sense.relations {
                if relation.label.as_deref() != Some(PRIMARY_LABEL) {
                    continue;
                }
                for target in relation.targets.split_whitespace() {
                    if normalize_key(target).is_empty() {
                        continue;
                    }
                    graph.add_primary_parent(sense_id, target);
                    stats.primary_edges += 1;
                }
            }
        }
    }
}

fn parse_events<R: BufRead>(mut reader: Reader<R>) -> Result<ParsedLexicon> {
    reader.trim_text(true);
    let mut builder = LmfBuilder::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                let element = Element::from_name(start.name().as_ref());
                builder.open(element, &start)?;
                builder.stack.push(element);
            }
            Event::Empty(start) => {
                let element = Element::from_name(start.name().as_ref());
                builder.open(element, &start)?;
                builder.close(element);
            }
            Event::End(end) => {
                let element = Element::from_name(end.name().as_ref());
                builder.stack.pop();
                builder.close(element);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(builder.parsed)
}

/// Parses an LMF lexicon into a sense graph. Entries or senses missing the
/// required pieces are skipped and counted in the stats.
pub fn parse_lmf_file(path: &Path) -> Result<ParsedLexicon> {
    let file = File::open(path).map_err(|e| AnimacyError::io(path, e))?;
    parse_events(Reader::from_reader(BufReader::new(file)))
}

pub fn parse_lmf_str(xml: &str) -> Result<ParsedLexicon> {
    parse_events(Reader::from_str(xml))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<LexicalResource>
  <Lexicon>
    <LexicalEntry>
      <Lemma>
        <FormRepresentation>
          <feat att="writtenForm" val="person"/>
          <feat att="partOfSpeech" val="nn"/>
          <feat att="lemgram" val="person..nn.1"/>
        </FormRepresentation>
      </Lemma>
      <Sense id="person..1"/>
    </LexicalEntry>
    <LexicalEntry>
      <Lemma>
        <FormRepresentation>
          <feat att="writtenForm" val="son"/>
          <feat att="writtenForm" val="sonen"/>
          <feat att="partOfSpeech" val="nn"/>
          <feat att="lemgram" val="son..nn.1"/>
        </FormRepresentation>
        <FormRepresentation>
          <feat att="writtenForm" val="ignored"/>
        </FormRepresentation>
      </Lemma>
      <Sense id="son..1">
        <SenseRelation targets="person..1 |släkting..1|">
          <feat att="label" val="primary"/>
        </SenseRelation>
        <SenseRelation targets="pappa..1">
          <feat att="label" val="secondary"/>
        </SenseRelation>
      </Sense>
      <Sense>
        <SenseRelation targets="x..1"><feat att="label" val="primary"/></SenseRelation>
      </Sense>
    </LexicalEntry>
    <LexicalEntry>
      <Sense id="orphan..1"/>
    </LexicalEntry>
  </Lexicon>
</LexicalResource>"#;

    #[test]
    fn parses_entries_senses_and_primary_edges() {
        let parsed = parse_lmf_str(SAMPLE).unwrap();
        let graph = &parsed.graph;

        assert_eq!(
            parsed.stats,
            LexiconStats {
                entries: 3,
                senses: 2,
                primary_edges: 2,
                skipped_entries: 1,
                skipped_senses: 1,
            }
        );

        let son = graph.get_id("son..1").unwrap();
        let info = graph.info(son).unwrap();
        assert_eq!(info.written_form, "son");
        assert_eq!(info.pos, "nn");
        assert_eq!(info.lemgram, "son..nn.1");

        let parents: Vec<&str> = graph
            .parents(son)
            .iter()
            .map(|&p| graph.get_str(p).unwrap())
            .collect();
        assert_eq!(parents, vec!["person..1", "släkting..1"]);
        assert!(graph.get_id("pappa..1").is_none());
        assert!(graph.get_id("orphan..1").is_none());
    }

    #[test]
    fn lemma_groups_in_document_order() {
        let parsed = parse_lmf_str(SAMPLE).unwrap();
        let lemgrams: Vec<&str> = parsed
            .graph
            .lemma_groups()
            .iter()
            .map(|g| g.lemgram.as_str())
            .collect();
        assert_eq!(lemgrams, vec!["person..nn.1", "son..nn.1"]);
    }

    #[test]
    fn broken_markup_is_fatal() {
        let result = parse_lmf_str("<LexicalResource><LexicalEntry></Lemma></LexicalResource>");
        assert!(matches!(result, Err(AnimacyError::Xml(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = parse_lmf_file(Path::new("/nonexistent/saldo.xml"));
        assert!(matches!(result, Err(AnimacyError::Io { .. })));
    }
}
