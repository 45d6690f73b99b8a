//! Static catalog of the recognized species.
//!
//! The order of [`SPECIES`] is the class order of the model output vector:
//! entry `i` describes class index `i`.

use serde::Serialize;

/// Description returned for an index the catalog does not know.
pub const UNKNOWN_DESCRIPTION: &str = "Información no disponible para esta especie.";

/// A single catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Species {
    /// Class index in the model output.
    pub index: usize,
    /// Display name (upper case, as produced by the training labels).
    pub name: &'static str,
    /// Short description shown under the prediction.
    pub description: &'static str,
}

/// All species the classifier knows, in class order.
pub const SPECIES: [Species; 10] = [
    Species {
        index: 0,
        name: "CHIPE CELESTE",
        description: "El Chipe Celeste (Setophaga cerulea) es un pequeño chipe migratorio de dorso azul cielo que anida en el dosel de bosques caducifolios maduros y pasa el invierno en los bosques andinos.",
    },
    Species {
        index: 1,
        name: "CHIPE DE CONNECTICUT",
        description: "El Chipe de Connecticut es una especie migratoria discreta que busca alimento caminando por el suelo de matorrales y pantanos; se reconoce por su capucha gris y su anillo ocular blanco completo.",
    },
    Species {
        index: 2,
        name: "CHIPE DE CONNECTICUT LORES NEGROS DE PECHERA",
        description: "El Chipe de Connecticut Lores Negros se distingue por la zona oscura entre el ojo y el pico y por la pechera gris que contrasta con el vientre amarillo.",
    },
    Species {
        index: 3,
        name: "CHIPE DE LAWRENCE",
        description: "El Chipe de Lawrence es conocido por su distintivo patrón de garganta y máscara negras sobre plumaje amarillo; es un híbrido entre el Chipe Alidorado y el Chipe Aliazul.",
    },
    Species {
        index: 4,
        name: "CHIPE DE PECHERA",
        description: "El Chipe de Pechera tiene tonos vibrantes en el pecho y frecuenta bordes de bosque y vegetación secundaria, donde captura insectos entre el follaje.",
    },
    Species {
        index: 5,
        name: "CHIPE DORADO",
        description: "El Chipe Dorado destaca por su plumaje amarillo intenso y alas gris azulado; anida en cavidades de árboles cerca de pantanos y ríos de corriente lenta.",
    },
    Species {
        index: 6,
        name: "CHIPE PEREGRINO",
        description: "El Chipe Peregrino es una especie ágil que recorre las puntas de las ramas en busca de insectos; realiza una de las migraciones más largas entre los chipes.",
    },
    Species {
        index: 7,
        name: "CHIPE TREPADOR",
        description: "El Chipe Trepador escala árboles con facilidad, recorriendo troncos y ramas como un trepador; su plumaje a rayas blancas y negras lo hace inconfundible.",
    },
    Species {
        index: 8,
        name: "MASCARITA EQUINOCCIAL",
        description: "La Mascarita Equinoccial tiene una máscara facial distintiva de color negro sobre un plumaje amarillo oliva; habita pastizales húmedos y bordes de humedales de Sudamérica.",
    },
    Species {
        index: 9,
        name: "PAVITO MIGRATORIO",
        description: "El Pavito Migratorio realiza largas migraciones entre Norteamérica y los trópicos; abre la cola y las alas para espantar insectos con sus destellos naranjas o amarillos.",
    },
];

/// Number of classes in the catalog.
pub const SPECIES_COUNT: usize = SPECIES.len();

/// Look up a catalog entry by class index.
pub fn species(index: usize) -> Option<&'static Species> {
    SPECIES.get(index)
}

/// Species display name for a class index.
pub fn species_name(index: usize) -> Option<&'static str> {
    species(index).map(|s| s.name)
}

/// Species description for a class index.
///
/// Falls back to [`UNKNOWN_DESCRIPTION`] for indices outside the catalog.
pub fn description(index: usize) -> &'static str {
    species(index).map_or(UNKNOWN_DESCRIPTION, |s| s.description)
}

/// Iterate over all species names in class order.
pub fn names() -> impl Iterator<Item = &'static str> {
    SPECIES.iter().map(|s| s.name)
}
