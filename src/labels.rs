use std::fs;
use std::path::Path;

use crate::error::ServiceError;

/// Species names in the order of the model's output layer.
pub const BIRD_SPECIES: &[&str] = &[
    "Amazona Alinaranja",
    "Amazona de San Vicente",
    "Amazona Mercenaria",
    "Amazona Real",
    "Aratinga de Pinceles",
    "Aratinga de Wagler",
    "Aratinga Ojiblanca",
    "Aratinga Orejigualda",
    "Aratinga Pertinaz",
    "Batará Barrado",
    "Batará Crestibarrado",
    "Batara Crestinegro",
    "Batará Mayor",
    "Batará Pizarroso Occidental",
    "Batará Unicolor",
    "Cacatua Ninfa",
    "Catita Frentirrufa",
    "Cotorra Colinegra",
    "Cotorra Pechiparda",
    "Cotorrita Alipinta",
    "Cotorrita de Anteojos",
    "Guacamaya Roja",
    "Guacamaya Verde",
    "Guacamayo Aliverde",
    "Guacamayo azuliamarillo",
    "Guacamayo Severo",
    "Hormiguerito Coicorita Norteño",
    "Hormiguerito Coicorita Sureño",
    "Hormiguerito Flanquialbo",
    "Hormiguerito Leonado",
    "Hormiguerito Plomizo",
    "Hormiguero Azabache",
    "Hormiguero Cantor",
    "Hormiguero de Parker",
    "Hormiguero Dorsicastaño",
    "Hormiguero Guardarribera Oriental",
    "Hormiguero Inmaculado",
    "Hormiguero Sencillo",
    "Hormiguero Ventriblanco",
    "Lorito Amazonico",
    "Lorito Cabecigualdo",
    "Lorito de fuertes",
    "Loro Alibronceado",
    "Loro Cabeciazul",
    "Loro Cachetes Amarillos",
    "Loro Corona Azul",
    "Loro Tumultuoso",
    "Ojodefuego Occidental",
    "Periquito Alas Amarillas",
    "Periquito Australiano",
    "Periquito Barrado",
    "Tiluchí Colilargo",
    "Tiluchí de Santander",
    "Tiluchi Lomirrufo",
];

/// Index-addressed class names. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn builtin() -> Self {
        Self::new(BIRD_SPECIES.iter().map(|s| s.to_string()).collect())
    }

    pub fn new(labels: Vec<String>) -> Self {
        LabelTable { labels }
    }

    /// One label per line; blank lines are skipped.
    pub fn from_file(path: &Path) -> Result<Self, ServiceError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ServiceError> {
        let labels: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        if labels.is_empty() {
            return Err(ServiceError::Internal("label file is empty".into()));
        }
        Ok(Self::new(labels))
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_table_keeps_training_order() {
        let table = LabelTable::builtin();
        assert_eq!(table.len(), 54);
        assert_eq!(table.get(0), Some("Amazona Alinaranja"));
        assert_eq!(table.get(21), Some("Guacamaya Roja"));
        assert_eq!(table.get(53), Some("Tiluchi Lomirrufo"));
        assert_eq!(table.get(54), None);
    }

    #[test]
    fn parse_skips_blank_lines() {
        let table = LabelTable::parse("cat\n\n  dog  \r\nbird\n").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(1), Some("dog"));
        assert_eq!(table.get(2), Some("bird"));
    }

    #[test]
    fn empty_label_file_is_rejected() {
        assert!(LabelTable::parse("\n \n").is_err());
    }

    #[test]
    fn from_file_reads_labels() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Guacamaya Roja").unwrap();
        writeln!(file, "Loro Tumultuoso").unwrap();

        let table = LabelTable::from_file(file.path()).unwrap();
        assert_eq!(table.get(1), Some("Loro Tumultuoso"));
    }
}
