//! Sequence-variant count table with sparse storage.

use crate::error::{GoodsError, Result};
use rayon::prelude::*;
use sprs::{CsMat, TriMat};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Specimen ids name their curve files, so they must stay inside the curve
/// directory.
fn is_file_safe(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\', '\0'])
}

/// A sparse table of sequence-variant (SV) counts across specimens.
///
/// Rows represent specimens, columns represent SVs, matching the layout of a
/// DADA2 `seqtab` written to CSV. Uses CSR (Compressed Sparse Row) format so a
/// specimen's nonzero counts can be visited without touching absent SVs.
#[derive(Debug, Clone)]
pub struct SequenceTable {
    /// Sparse matrix in CSR format (specimens × SVs)
    data: CsMat<u64>,
    /// SV identifiers (column names)
    sv_ids: Vec<String>,
    /// Specimen identifiers (row names)
    specimen_ids: Vec<String>,
}

impl SequenceTable {
    /// Create a new SequenceTable from a sparse matrix and identifiers.
    pub fn new(data: CsMat<u64>, sv_ids: Vec<String>, specimen_ids: Vec<String>) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if ncols != sv_ids.len() {
            return Err(GoodsError::InvalidParameter(format!(
                "{} SV ids given for {} columns",
                sv_ids.len(),
                ncols
            )));
        }
        if nrows != specimen_ids.len() {
            return Err(GoodsError::InvalidParameter(format!(
                "{} specimen ids given for {} rows",
                specimen_ids.len(),
                nrows
            )));
        }
        let mut seen = HashSet::with_capacity(specimen_ids.len());
        for id in &specimen_ids {
            if !is_file_safe(id) {
                return Err(GoodsError::InvalidSpecimenId(id.clone()));
            }
            if !seen.insert(id.as_str()) {
                return Err(GoodsError::DuplicateSpecimen(id.clone()));
            }
        }
        Ok(Self {
            data,
            sv_ids,
            specimen_ids,
        })
    }

    /// Build a table from dense per-specimen count rows.
    ///
    /// Every row must carry exactly one count per SV.
    pub fn from_rows(sv_ids: Vec<String>, rows: Vec<(String, Vec<u64>)>) -> Result<Self> {
        let n_svs = sv_ids.len();
        let mut tri_mat = TriMat::new((rows.len(), n_svs));
        let mut specimen_ids = Vec::with_capacity(rows.len());

        for (row_idx, (specimen, counts)) in rows.into_iter().enumerate() {
            if counts.len() != n_svs {
                return Err(GoodsError::DimensionMismatch {
                    specimen,
                    expected: n_svs,
                    actual: counts.len(),
                });
            }
            for (col_idx, count) in counts.into_iter().enumerate() {
                if count > 0 {
                    tri_mat.add_triplet(row_idx, col_idx, count);
                }
            }
            specimen_ids.push(specimen);
        }

        Self::new(tri_mat.to_csr(), sv_ids, specimen_ids)
    }

    /// Load a sequence table from a CSV file.
    ///
    /// Expected format:
    /// - First row: empty first cell, then SV identifiers
    /// - Subsequent rows: specimen ID followed by one nonnegative integer count per SV
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a sequence table from any CSV source.
    ///
    /// Any malformed row aborts the whole parse: SV columns must stay aligned
    /// across every specimen for the prevalence vote to be meaningful.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = csv_reader.records();

        let header = records
            .next()
            .ok_or_else(|| GoodsError::EmptyData("Sequence table has no header row".to_string()))??;
        if header.len() < 2 {
            return Err(GoodsError::EmptyData(
                "Sequence table must have at least one SV column".to_string(),
            ));
        }
        let sv_ids: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
        let n_svs = sv_ids.len();

        // Parse data rows into triplets for sparse matrix construction
        let mut triplets: Vec<(usize, usize, u64)> = Vec::new();
        let mut specimen_ids: Vec<String> = Vec::new();

        for record in records {
            let record = record?;
            let specimen = record.get(0).unwrap_or_default().to_string();
            let actual = record.len().saturating_sub(1);
            if actual != n_svs {
                return Err(GoodsError::DimensionMismatch {
                    specimen,
                    expected: n_svs,
                    actual,
                });
            }

            let row_idx = specimen_ids.len();
            for (col_idx, value_str) in record.iter().skip(1).enumerate() {
                let value: u64 = value_str.parse().map_err(|_| GoodsError::InvalidCount {
                    value: value_str.to_string(),
                    specimen: specimen.clone(),
                    sv: col_idx,
                })?;
                if value > 0 {
                    triplets.push((row_idx, col_idx, value));
                }
            }
            specimen_ids.push(specimen);
        }

        let mut tri_mat = TriMat::new((specimen_ids.len(), n_svs));
        for (row, col, val) in triplets {
            tri_mat.add_triplet(row, col, val);
        }

        Self::new(tri_mat.to_csr(), sv_ids, specimen_ids)
    }

    /// Write the table to a CSV file in the same layout it is read from.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.to_writer(BufWriter::new(file))
    }

    /// Write the table as CSV to any sink.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.n_svs() + 1);
        header.push("");
        header.extend(self.sv_ids.iter().map(String::as_str));
        csv_writer.write_record(&header)?;

        for (row_idx, specimen) in self.specimen_ids.iter().enumerate() {
            let mut record = Vec::with_capacity(self.n_svs() + 1);
            record.push(specimen.clone());
            record.extend(self.row_dense(row_idx).into_iter().map(|c| c.to_string()));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Get the count at (specimen, SV), returning 0 for missing entries.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.data.get(row, col).copied().unwrap_or(0)
    }

    /// Number of specimens (rows).
    #[inline]
    pub fn n_specimens(&self) -> usize {
        self.data.rows()
    }

    /// Number of SVs (columns).
    #[inline]
    pub fn n_svs(&self) -> usize {
        self.data.cols()
    }

    /// SV identifiers.
    #[inline]
    pub fn sv_ids(&self) -> &[String] {
        &self.sv_ids
    }

    /// Specimen identifiers.
    #[inline]
    pub fn specimen_ids(&self) -> &[String] {
        &self.specimen_ids
    }

    /// Row index of a specimen.
    pub fn specimen_index(&self, specimen: &str) -> Option<usize> {
        self.specimen_ids.iter().position(|id| id == specimen)
    }

    /// Get the dense count vector of one specimen.
    pub fn row_dense(&self, row: usize) -> Vec<u64> {
        let mut dense = vec![0u64; self.n_svs()];
        if let Some(row_vec) = self.data.outer_view(row) {
            for (col, &val) in row_vec.iter() {
                dense[col] = val;
            }
        }
        dense
    }

    /// Total reads per specimen.
    pub fn read_depths(&self) -> Vec<u64> {
        (0..self.n_specimens())
            .into_par_iter()
            .map(|row| {
                self.data
                    .outer_view(row)
                    .map(|v| v.iter().map(|(_, &val)| val).sum())
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Subset the table to the specified SV columns (by index), keeping their order.
    pub fn subset_svs(&self, indices: &[usize]) -> Result<Self> {
        let n_specimens = self.n_specimens();
        let n_svs = indices.len();

        // Build column index mapping
        let mut col_map: HashMap<usize, usize> = HashMap::with_capacity(n_svs);
        let mut new_sv_ids = Vec::with_capacity(n_svs);
        for (new_idx, &old_idx) in indices.iter().enumerate() {
            if old_idx >= self.n_svs() {
                return Err(GoodsError::InvalidParameter(format!(
                    "SV index {} out of bounds",
                    old_idx
                )));
            }
            col_map.insert(old_idx, new_idx);
            new_sv_ids.push(self.sv_ids[old_idx].clone());
        }

        let mut tri_mat = TriMat::new((n_specimens, n_svs));
        for (row, row_vec) in self.data.outer_iterator().enumerate() {
            for (old_col, &val) in row_vec.iter() {
                if let Some(&new_col) = col_map.get(&old_col) {
                    tri_mat.add_triplet(row, new_col, val);
                }
            }
        }

        Self::new(tri_mat.to_csr(), new_sv_ids, self.specimen_ids.clone())
    }

    /// Subset the table to the specified specimens (by index), keeping their order.
    pub fn subset_specimens(&self, indices: &[usize]) -> Result<Self> {
        let n_specimens = indices.len();
        let n_svs = self.n_svs();

        let mut tri_mat = TriMat::new((n_specimens, n_svs));
        let mut new_specimen_ids = Vec::with_capacity(n_specimens);

        for (new_row, &old_row) in indices.iter().enumerate() {
            if old_row >= self.n_specimens() {
                return Err(GoodsError::InvalidParameter(format!(
                    "Specimen index {} out of bounds",
                    old_row
                )));
            }
            new_specimen_ids.push(self.specimen_ids[old_row].clone());

            if let Some(row_vec) = self.data.outer_view(old_row) {
                for (col, &val) in row_vec.iter() {
                    tri_mat.add_triplet(new_row, col, val);
                }
            }
        }

        Self::new(tri_mat.to_csr(), self.sv_ids.clone(), new_specimen_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_table() -> SequenceTable {
        // 4 specimens × 3 SVs
        SequenceTable::from_rows(
            vec!["ACGT".to_string(), "GGCC".to_string(), "TTAA".to_string()],
            vec![
                ("s1".to_string(), vec![10, 100, 1]),
                ("s2".to_string(), vec![20, 200, 0]),
                ("s3".to_string(), vec![0, 150, 0]),
                ("s4".to_string(), vec![5, 175, 0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_dimensions() {
        let table = create_test_table();
        assert_eq!(table.n_specimens(), 4);
        assert_eq!(table.n_svs(), 3);
    }

    #[test]
    fn test_get_values() {
        let table = create_test_table();
        assert_eq!(table.get(0, 0), 10);
        assert_eq!(table.get(2, 0), 0);
        assert_eq!(table.get(0, 2), 1);
    }

    #[test]
    fn test_row_dense() {
        let table = create_test_table();
        assert_eq!(table.row_dense(1), vec![20, 200, 0]);
        assert_eq!(table.row_dense(2), vec![0, 150, 0]);
    }

    #[test]
    fn test_read_depths() {
        let table = create_test_table();
        assert_eq!(table.read_depths(), vec![111, 220, 150, 180]);
    }

    #[test]
    fn test_parse_csv() {
        let input = ",ACGT,GGCC\nspecimen_a,9,1\nspecimen_b,0,0\n";
        let table = SequenceTable::from_reader(input.as_bytes()).unwrap();
        assert_eq!(table.sv_ids(), &["ACGT", "GGCC"]);
        assert_eq!(table.specimen_ids(), &["specimen_a", "specimen_b"]);
        assert_eq!(table.row_dense(0), vec![9, 1]);
        assert_eq!(table.row_dense(1), vec![0, 0]);
    }

    #[test]
    fn test_parse_ragged_row() {
        let input = ",A,B\ns1,1,2\ns2,3\n";
        let err = SequenceTable::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            GoodsError::DimensionMismatch { ref specimen, expected: 2, actual: 1 } if specimen == "s2"
        ));
    }

    #[test]
    fn test_parse_rejects_bad_counts() {
        for bad in ["-1", "1.5", "abc", ""] {
            let input = format!(",A,B\ns1,{},2\n", bad);
            let err = SequenceTable::from_reader(input.as_bytes()).unwrap_err();
            assert!(
                matches!(err, GoodsError::InvalidCount { sv: 0, .. }),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_duplicate_specimen() {
        let input = ",A\ns1,1\ns1,2\n";
        let err = SequenceTable::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, GoodsError::DuplicateSpecimen(ref id) if id == "s1"));
    }

    #[test]
    fn test_parse_rejects_path_like_specimen_ids() {
        for id in ["../escape", "sub/dir", "back\\slash", "..", ""] {
            let input = format!(",A\n{},1\n", id);
            let err = SequenceTable::from_reader(input.as_bytes()).unwrap_err();
            assert!(
                matches!(err, GoodsError::InvalidSpecimenId(ref bad) if bad == id),
                "{:?} accepted",
                id
            );
        }
        // Dots inside an id are fine
        let table = SequenceTable::from_reader(",A\nrun.1..b,1\n".as_bytes()).unwrap();
        assert_eq!(table.specimen_ids(), &["run.1..b"]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(
            SequenceTable::from_reader("".as_bytes()),
            Err(GoodsError::EmptyData(_))
        ));
        assert!(matches!(
            SequenceTable::from_reader("specimen\n".as_bytes()),
            Err(GoodsError::EmptyData(_))
        ));
    }

    #[test]
    fn test_csv_roundtrip() {
        let table = create_test_table();

        let temp_file = NamedTempFile::new().unwrap();
        table.to_csv(temp_file.path()).unwrap();

        let loaded = SequenceTable::from_csv(temp_file.path()).unwrap();
        assert_eq!(loaded.sv_ids(), table.sv_ids());
        assert_eq!(loaded.specimen_ids(), table.specimen_ids());
        for row in 0..table.n_specimens() {
            assert_eq!(loaded.row_dense(row), table.row_dense(row));
        }
    }

    #[test]
    fn test_csv_header_has_empty_first_cell() {
        let table = create_test_table();
        let mut buf = Vec::new();
        table.to_writer(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with(",ACGT,GGCC,TTAA\n"));
        assert!(text.contains("s1,10,100,1\n"));
    }

    #[test]
    fn test_from_csv_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ",A,B,C").unwrap();
        writeln!(file, "s1, 3 ,0,7").unwrap();
        file.flush().unwrap();
        let table = SequenceTable::from_csv(file.path()).unwrap();
        assert_eq!(table.row_dense(0), vec![3, 0, 7]);
    }

    #[test]
    fn test_subset_svs() {
        let table = create_test_table();
        let subset = table.subset_svs(&[0, 2]).unwrap();

        assert_eq!(subset.n_specimens(), 4);
        assert_eq!(subset.sv_ids(), &["ACGT", "TTAA"]);
        assert_eq!(subset.row_dense(0), vec![10, 1]);
        assert!(table.subset_svs(&[3]).is_err());
    }

    #[test]
    fn test_subset_specimens() {
        let table = create_test_table();
        let subset = table.subset_specimens(&[1, 3]).unwrap();

        assert_eq!(subset.specimen_ids(), &["s2", "s4"]);
        assert_eq!(subset.row_dense(1), vec![5, 175, 0]);
    }
}
