use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use log::{debug, info, warn};

use pgxguard_core::config::PipelineConfig;
use pgxguard_core::consts::DEFAULT_MIN_QUALITY;
use pgxguard_core::models::{Genotype, VariantRecord};
use pgxguard_core::rules::RuleSet;
use pgxguard_core::utils::get_dynamic_reader;

use crate::errors::{Result, VcfError};

const MIN_COLUMNS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseOptions {
    pub min_quality: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            min_quality: DEFAULT_MIN_QUALITY,
        }
    }
}

impl From<&PipelineConfig> for ParseOptions {
    fn from(config: &PipelineConfig) -> Self {
        ParseOptions {
            min_quality: config.min_quality,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoValue {
    Flag,
    Value(String),
}

impl InfoValue {
    pub fn as_value(&self) -> Option<&str> {
        match self {
            InfoValue::Value(v) => Some(v.as_str()),
            InfoValue::Flag => None,
        }
    }
}

///
/// Parse an INFO column into key/value pairs.
///
/// `KEY=VALUE` items become [InfoValue::Value]; bare tokens become
/// [InfoValue::Flag]. An empty or `.` column yields an empty map.
///
pub fn parse_info_field(info: &str) -> HashMap<String, InfoValue> {
    let mut result = HashMap::new();
    let info = info.trim();
    if info.is_empty() || info == "." {
        return result;
    }

    for item in info.split(';') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        match item.split_once('=') {
            Some((key, value)) => {
                result.insert(
                    key.trim().to_string(),
                    InfoValue::Value(value.trim().to_string()),
                );
            }
            None => {
                result.insert(item.to_string(), InfoValue::Flag);
            }
        }
    }

    result
}

fn info_value<'a>(info: &'a HashMap<String, InfoValue>, key: &str) -> Option<&'a str> {
    info.get(key)
        .and_then(InfoValue::as_value)
        .filter(|v| !v.is_empty())
}

/// Pull the GT subfield out of a FORMAT/SAMPLE pair.
fn parse_format_genotype(format: Option<&str>, sample: Option<&str>) -> Genotype {
    let (Some(format), Some(sample)) = (format, sample) else {
        return Genotype::default();
    };

    let gt_idx = format.split(':').position(|field| field == "GT");
    match gt_idx.and_then(|idx| sample.split(':').nth(idx)) {
        Some(gt) => Genotype::parse(gt),
        None => Genotype::default(),
    }
}

fn parse_quality(raw: &str) -> f64 {
    match raw.trim() {
        "." => 0.0,
        other => other.parse::<f64>().ok().filter(|q| q.is_finite()).unwrap_or(0.0),
    }
}

/// Structural check run before parsing.
pub fn validate_vcf_content(content: &str) -> Result<()> {
    let mut seen_header = false;
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with("#CHROM") {
            seen_header = true;
            continue;
        }
        if seen_header && !line.is_empty() && !line.starts_with('#') {
            return Ok(());
        }
    }

    if seen_header {
        Err(VcfError::NoVariantData)
    } else {
        Err(VcfError::MissingHeader)
    }
}

///
/// Line-at-a-time VCF reader.
///
/// Feed lines with [VcfParser::push_line] and collect the retained records
/// with [VcfParser::finish]. Nothing a single line contains can fail the
/// parse; bad lines are logged and dropped.
///
pub struct VcfParser<'a> {
    rules: &'a RuleSet,
    options: ParseOptions,
    seen_header: bool,
    line_number: usize,
    records: Vec<VariantRecord>,
}

impl<'a> VcfParser<'a> {
    pub fn new(rules: &'a RuleSet, options: ParseOptions) -> Self {
        VcfParser {
            rules,
            options,
            seen_header: false,
            line_number: 0,
            records: Vec::new(),
        }
    }

    pub fn push_line(&mut self, line: &str) {
        self.line_number += 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with("##") {
            return;
        }
        if line.starts_with("#CHROM") {
            self.seen_header = true;
            return;
        }
        if !self.seen_header || line.starts_with('#') {
            return;
        }

        if let Some(record) = self.parse_data_line(line) {
            self.records.push(record);
        }
    }

    fn parse_data_line(&self, line: &str) -> Option<VariantRecord> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_COLUMNS {
            warn!("Line {}: Insufficient columns, skipping", self.line_number);
            return None;
        }

        let chrom = fields[0];
        let pos = match fields[1].trim().parse::<u64>() {
            Ok(pos) => pos,
            Err(_) => {
                warn!(
                    "Line {}: Invalid POS `{}`, skipping",
                    self.line_number, fields[1]
                );
                return None;
            }
        };

        let qual = parse_quality(fields[5]);
        if qual < self.options.min_quality {
            debug!(
                "Line {}: Quality {} below threshold {}, skipping",
                self.line_number, qual, self.options.min_quality
            );
            return None;
        }

        let info = parse_info_field(fields[7]);
        let mut gene = info_value(&info, "GENE").map(String::from);
        let mut star_allele = info_value(&info, "STAR").map(String::from);

        let rsid = match fields[2].trim() {
            "" | "." => info_value(&info, "RS").map(String::from),
            id => Some(id.to_string()),
        };

        let annotation = rsid.as_deref().and_then(|id| self.rules.allele_for_rsid(id));
        if let Some(annotation) = annotation {
            if gene.is_none() {
                gene = Some(annotation.gene.clone());
            }
            if star_allele.is_none() {
                star_allele = Some(annotation.star.clone());
            }
        }

        if let Some(g) = gene.as_deref() {
            if !self.rules.is_target_gene(g) {
                debug!("Line {}: Gene {} is not a target gene", self.line_number, g);
                return None;
            }
        }

        let genotype = parse_format_genotype(fields.get(8).copied(), fields.get(9).copied());

        Some(VariantRecord {
            chrom: chrom.to_string(),
            pos,
            rsid: rsid.unwrap_or_else(|| format!("chr{chrom}:{pos}")),
            ref_allele: fields[3].to_string(),
            alt_allele: fields[4].to_string(),
            qual,
            gene,
            star_allele,
            genotype,
            function: annotation.and_then(|a| a.function.clone()),
        })
    }

    pub fn finish(self) -> Vec<VariantRecord> {
        info!("Parsed {} variants from VCF", self.records.len());
        self.records
    }
}

/// Parse VCF text. Call [validate_vcf_content] first to reject broken files.
pub fn parse_vcf_content(
    content: &str,
    rules: &RuleSet,
    options: &ParseOptions,
) -> Vec<VariantRecord> {
    let mut parser = VcfParser::new(rules, *options);
    for line in content.lines() {
        parser.push_line(line);
    }
    parser.finish()
}

///
/// Read, validate and parse a VCF file from disk. Gzipped files
/// (`.vcf.gz`) are decompressed on the fly.
///
pub fn parse_vcf_file(
    path: &Path,
    rules: &RuleSet,
    options: &ParseOptions,
) -> Result<Vec<VariantRecord>> {
    let mut reader = get_dynamic_reader(path)?;
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    validate_vcf_content(&content)?;
    Ok(parse_vcf_content(&content, rules, options))
}
