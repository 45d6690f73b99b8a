//! Species table listing.

use crate::catalog::{self, Species};
use crate::config::OutputMode;
use crate::output::emit_json_result;
use crate::output::json_envelope::{ResultType, SpeciesEntry, SpeciesListPayload};
use std::io::Write;

/// Print the species the model can identify.
pub fn list_species(mode: OutputMode) -> std::io::Result<()> {
    match mode {
        OutputMode::Json => {
            emit_json_result(&species_payload(&catalog::SPECIES));
            Ok(())
        }
        OutputMode::Human => write_table(&mut std::io::stdout().lock(), &catalog::SPECIES),
    }
}

fn species_payload(species: &[Species]) -> SpeciesListPayload {
    SpeciesListPayload {
        result_type: ResultType::SpeciesList,
        species_count: species.len(),
        species: species
            .iter()
            .map(|s| SpeciesEntry {
                index: s.index,
                name: s.name.to_string(),
                description: s.description.to_string(),
            })
            .collect(),
    }
}

fn write_table<W: Write>(out: &mut W, species: &[Species]) -> std::io::Result<()> {
    writeln!(out, "{} species:", species.len())?;
    for s in species {
        writeln!(out, "{:>3}  {}", s.index, s.name)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_species_in_order() {
        let mut out = Vec::new();
        write_table(&mut out, &catalog::SPECIES).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "10 species:");
        assert_eq!(lines[1], "  0  CHIPE CELESTE");
        assert_eq!(lines[10], "  9  PAVITO MIGRATORIO");
    }

    #[test]
    fn test_payload_matches_catalog() {
        let payload = species_payload(&catalog::SPECIES);
        assert_eq!(payload.species_count, 10);
        assert_eq!(payload.species[2].name, "CHIPE DE CONNECTICUT LORES NEGROS DE PECHERA");
        assert!(!payload.species[5].description.is_empty());
    }
}
