//! GFF3 line selection and record parsing
//!
//! # Format
//! ```text
//! seqid  source  type  start  end  score  strand  phase  attributes
//! DDB0232428  Sequencing Center  chromosome  1  4919561  .  +  .  ID=DDB0232428;Name=1
//! ```
//!
//! Columns are tab separated and addressed by position. Attributes are
//! `;`-separated `key=value` tokens; only their position matters here: the
//! first value is the record id, and for regions the second is the name.

use super::error::ParseError;
use super::models::{Feature, Region};

pub const SEQID: usize = 0;
pub const SOURCE: usize = 1;
pub const TYPE: usize = 2;
pub const START: usize = 3;
pub const END: usize = 4;
pub const STRAND: usize = 6;
pub const ATTRIBUTES: usize = 8;

/// Marks the end of annotations; FASTA sequence data may follow.
pub const END_OF_ANNOTATIONS: &str = "###";

/// Tab-split view of one GFF3 line
#[derive(Debug, Clone)]
pub struct Columns<'a> {
    fields: Vec<&'a str>,
}

impl<'a> Columns<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            fields: line.trim_end_matches(['\n', '\r']).split('\t').collect(),
        }
    }

    pub fn feature_type(&self) -> Option<&'a str> {
        self.fields.get(TYPE).copied()
    }

    pub fn field(&self, index: usize) -> Result<&'a str, ParseError> {
        self.fields
            .get(index)
            .copied()
            .ok_or(ParseError::MissingColumn {
                expected: index + 1,
                found: self.fields.len(),
            })
    }

    pub fn coordinate(&self, index: usize, column: &'static str) -> Result<i64, ParseError> {
        let raw = self.field(index)?;
        raw.trim().parse().map_err(|_| ParseError::InvalidCoordinate {
            column,
            value: raw.to_string(),
        })
    }

    pub fn attributes(&self) -> Result<Attributes<'a>, ParseError> {
        Ok(Attributes::new(self.field(ATTRIBUTES)?))
    }
}

/// Positional view of the attributes column
#[derive(Debug, Clone)]
pub struct Attributes<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> Attributes<'a> {
    pub fn new(column: &'a str) -> Self {
        Self {
            tokens: column.split(';').filter(|t| !t.trim().is_empty()).collect(),
        }
    }

    /// Value half of the `position`-th `key=value` token
    pub fn value(&self, position: usize) -> Result<&'a str, ParseError> {
        let token = self
            .tokens
            .get(position)
            .ok_or(ParseError::MissingAttribute { position })?;
        token
            .split_once('=')
            .map(|(_, value)| value)
            .ok_or_else(|| ParseError::MalformedAttribute {
                token: token.to_string(),
            })
    }
}

/// Walks a line stream and picks the lines of one feature type.
///
/// Directive and comment lines are skipped. Once the `###` marker is seen no
/// further line is ever selected, although callers keep feeding lines so the
/// upstream lane is drained.
#[derive(Debug, Default)]
pub struct AnnotationScanner {
    line_number: usize,
    annotations_ended: bool,
}

impl AnnotationScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based number of the last line passed to [`select`](Self::select)
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn annotations_ended(&self) -> bool {
        self.annotations_ended
    }

    pub fn select<'a>(&mut self, line: &'a str, feature_type: &str) -> Option<Columns<'a>> {
        self.line_number += 1;

        if self.annotations_ended {
            return None;
        }
        if line.starts_with(END_OF_ANNOTATIONS) {
            self.annotations_ended = true;
            return None;
        }
        if line.starts_with('#') || line.trim().is_empty() {
            return None;
        }

        let columns = Columns::new(line);
        (columns.feature_type() == Some(feature_type)).then_some(columns)
    }
}

/// Build a region record, returning its id alongside
pub fn parse_region(columns: &Columns<'_>) -> Result<(String, Region), ParseError> {
    let start = columns.coordinate(START, "start")?;
    let end = columns.coordinate(END, "end")?;
    let attributes = columns.attributes()?;
    let id = attributes.value(0)?.to_string();
    let name = attributes.value(1)?.to_string();
    let length = end
        .checked_sub(start)
        .ok_or(ParseError::LengthOverflow { start, end })?;

    Ok((
        id.clone(),
        Region {
            name,
            id,
            length,
            start,
            end,
        },
    ))
}

/// Build a generic feature record, returning its id alongside
pub fn parse_feature(columns: &Columns<'_>) -> Result<(String, Feature), ParseError> {
    let seqid = columns.field(SEQID)?;
    let source = columns.field(SOURCE)?;
    let start = columns.coordinate(START, "start")?;
    let end = columns.coordinate(END, "end")?;
    let strand = columns.field(STRAND)?;
    let id = columns.attributes()?.value(0)?.to_string();

    Ok((
        id,
        Feature {
            seqid: seqid.to_string(),
            block_id: seqid.to_string(),
            source: source.to_string(),
            start,
            end,
            strand: strand.to_string(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROMOSOME: &str =
        "DDB0232428\tSequencing Center\tchromosome\t1\t4919561\t.\t+\t.\tID=DDB0232428;Name=1\n";
    const GENE: &str =
        "DDB0232428\tdictyBase\tgene\t8430\t9560\t.\t-\t.\tID=DDB_G0267178;Name=DDB_G0267178_RTE\n";

    #[test]
    fn test_scanner_selects_matching_type() {
        let mut scanner = AnnotationScanner::new();
        assert!(scanner.select(CHROMOSOME, "gene").is_none());
        assert!(scanner.select(GENE, "gene").is_some());
        assert_eq!(scanner.line_number(), 2);
    }

    #[test]
    fn test_scanner_skips_directives_and_comments() {
        let mut scanner = AnnotationScanner::new();
        assert!(scanner.select("##gff-version 3\n", "gene").is_none());
        assert!(scanner.select("#!genome-build dicty 2.7\n", "gene").is_none());
        assert!(scanner.select("\n", "gene").is_none());
        assert!(!scanner.annotations_ended());
    }

    #[test]
    fn test_scanner_stops_after_marker() {
        let mut scanner = AnnotationScanner::new();
        assert!(scanner.select("###\n", "gene").is_none());
        assert!(scanner.annotations_ended());
        assert!(scanner.select(GENE, "gene").is_none());
        assert!(scanner.select(">DDB0232428\n", "gene").is_none());
        assert_eq!(scanner.line_number(), 3);
    }

    #[test]
    fn test_short_lines_never_match() {
        let mut scanner = AnnotationScanner::new();
        assert!(scanner.select("ACGTTGCA\n", "gene").is_none());
        assert!(scanner.select("a\tb\n", "gene").is_none());
    }

    #[test]
    fn test_parse_region() {
        let (id, region) = parse_region(&Columns::new(CHROMOSOME)).unwrap();
        assert_eq!(id, "DDB0232428");
        assert_eq!(region.name, "1");
        assert_eq!(region.start, 1);
        assert_eq!(region.end, 4919561);
        assert_eq!(region.length, 4919560);
    }

    #[test]
    fn test_parse_region_keeps_negative_length() {
        let line = "chr\t.\tsupercontig\t500\t100\t.\t+\t.\tID=sc1;Name=sc1";
        let (_, region) = parse_region(&Columns::new(line)).unwrap();
        assert_eq!(region.length, -400);
    }

    #[test]
    fn test_region_length_overflow_is_an_error() {
        let line = "c1\t.\tchromosome\t-9223372036854775808\t1\t.\t+\t.\tID=c1;Name=one";
        let err = parse_region(&Columns::new(line)).unwrap_err();
        assert_eq!(
            err,
            ParseError::LengthOverflow {
                start: i64::MIN,
                end: 1
            }
        );

        let line = "c1\t.\tchromosome\t-1\t9223372036854775807\t.\t+\t.\tID=c1;Name=one";
        assert!(matches!(
            parse_region(&Columns::new(line)),
            Err(ParseError::LengthOverflow { .. })
        ));
    }

    #[test]
    fn test_parse_feature() {
        let (id, feature) = parse_feature(&Columns::new(GENE)).unwrap();
        assert_eq!(id, "DDB_G0267178");
        assert_eq!(feature.seqid, "DDB0232428");
        assert_eq!(feature.block_id, "DDB0232428");
        assert_eq!(feature.source, "dictyBase");
        assert_eq!((feature.start, feature.end), (8430, 9560));
        assert_eq!(feature.strand, "-");
    }

    #[test]
    fn test_parse_feature_empty_source() {
        let line = "chr1\t\tgene\t1\t2\t.\t+\t.\tID=g1";
        let (_, feature) = parse_feature(&Columns::new(line)).unwrap();
        assert_eq!(feature.source, "");
    }

    #[test]
    fn test_attribute_values_exclude_line_terminator() {
        let (_, region) = parse_region(&Columns::new("c\t.\tchromosome\t1\t9\t.\t+\t.\tID=c1;Name=one\r\n")).unwrap();
        assert_eq!(region.name, "one");
    }

    #[test]
    fn test_non_numeric_coordinate_is_an_error() {
        let line = "chr1\t.\tgene\tabc\t2\t.\t+\t.\tID=g1";
        let err = parse_feature(&Columns::new(line)).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidCoordinate {
                column: "start",
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_region_without_name_is_an_error() {
        let line = "chr1\t.\tchromosome\t1\t2\t.\t+\t.\tID=chr1";
        let err = parse_region(&Columns::new(line)).unwrap_err();
        assert_eq!(err, ParseError::MissingAttribute { position: 1 });
    }

    #[test]
    fn test_attribute_without_separator_is_an_error() {
        let line = "chr1\t.\tgene\t1\t2\t.\t+\t.\tg1;Name=x";
        let err = parse_feature(&Columns::new(line)).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedAttribute {
                token: "g1".to_string()
            }
        );
    }

    #[test]
    fn test_missing_attribute_column_is_an_error() {
        let line = "chr1\t.\tgene\t1\t2\t.\t+";
        let err = parse_feature(&Columns::new(line)).unwrap_err();
        assert_eq!(err, ParseError::MissingColumn { expected: 9, found: 7 });
    }
}
