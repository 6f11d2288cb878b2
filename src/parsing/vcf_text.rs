
use anyhow::Context;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Opens a VCF as text, transparently decompressing ".gz" inputs (gzip or BGZF)
/// # Arguments
/// * `filename` - path to the .vcf(.gz) file
pub fn open_vcf_text(filename: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    let file = File::open(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;
    let is_compressed = filename.extension().unwrap_or_default() == "gz";
    let reader: Box<dyn BufRead> = if is_compressed {
        Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_plain_and_gz() {
        let dir = tempfile::tempdir().unwrap();
        let content = "##fileformat=VCFv4.2\n#CHROM\tPOS\n";

        let plain_fn = dir.path().join("a.vcf");
        std::fs::write(&plain_fn, content).unwrap();
        let lines: Vec<String> = open_vcf_text(&plain_fn).unwrap().lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["##fileformat=VCFv4.2", "#CHROM\tPOS"]);

        let gz_fn = dir.path().join("a.vcf.gz");
        let mut encoder = flate2::write::GzEncoder::new(File::create(&gz_fn).unwrap(), flate2::Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap();
        let gz_lines: Vec<String> = open_vcf_text(&gz_fn).unwrap().lines().map(|l| l.unwrap()).collect();
        assert_eq!(gz_lines, lines);
    }
}
