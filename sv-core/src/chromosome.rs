use std::{fmt::Display, str::FromStr};

use thiserror::Error;

/// A chromosome label, ordered by its band index.
///
/// Autosomes map to their own number, the sex and mitochondrial chromosomes
/// to the sentinel indices `X = 23`, `Y = 24` and `M = 25`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Chromosome {
    /// Autosome `1..=22`. Construct through [`Chromosome::from_index`] or parsing.
    Autosome(u8),
    X,
    Y,
    M,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChromosomeError {
    #[error("Invalid chromosome label `{0}`")]
    InvalidLabel(String),
    #[error("Chromosome index {0} is outside 1..=25")]
    InvalidIndex(u8),
}

impl Chromosome {
    pub const AUTOSOMES: u8 = 22;

    /// Index of the band this chromosome occupies in the total order `1..=25`.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Autosome(n) => n,
            Self::X => 23,
            Self::Y => 24,
            Self::M => 25,
        }
    }

    pub const fn from_index(index: u8) -> Result<Self, ChromosomeError> {
        match index {
            1..=Self::AUTOSOMES => Ok(Self::Autosome(index)),
            23 => Ok(Self::X),
            24 => Ok(Self::Y),
            25 => Ok(Self::M),
            _ => Err(ChromosomeError::InvalidIndex(index)),
        }
    }
}

impl FromStr for Chromosome {
    type Err = ChromosomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let label = trimmed
            .get(..3)
            .filter(|prefix| prefix.eq_ignore_ascii_case("chr"))
            .map_or(trimmed, |_| &trimmed[3..]);
        match label.to_ascii_uppercase().as_str() {
            "X" => Ok(Self::X),
            "Y" => Ok(Self::Y),
            "M" | "MT" => Ok(Self::M),
            number => number
                .parse::<u8>()
                .ok()
                .and_then(|index| Self::from_index(index).ok())
                .ok_or_else(|| ChromosomeError::InvalidLabel(s.to_owned())),
        }
    }
}

impl Display for Chromosome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Autosome(n) => n.fmt(f),
            Self::X => f.write_str("X"),
            Self::Y => f.write_str("Y"),
            Self::M => f.write_str("M"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1", Chromosome::Autosome(1))]
    #[case("22", Chromosome::Autosome(22))]
    #[case("chr7", Chromosome::Autosome(7))]
    #[case("X", Chromosome::X)]
    #[case("chrY", Chromosome::Y)]
    #[case("MT", Chromosome::M)]
    #[case("m", Chromosome::M)]
    #[case("23", Chromosome::X)]
    #[case("24", Chromosome::Y)]
    #[case("25", Chromosome::M)]
    fn parse_label(#[case] label: &str, #[case] expected: Chromosome) {
        assert_eq!(label.parse(), Ok(expected));
    }

    #[rstest]
    #[case("0")]
    #[case("26")]
    #[case("chr")]
    #[case("Z")]
    #[case("")]
    fn reject_label(#[case] label: &str) {
        assert!(label.parse::<Chromosome>().is_err());
    }

    #[rstest]
    #[case(Chromosome::X, 23, "X")]
    #[case(Chromosome::Y, 24, "Y")]
    #[case(Chromosome::M, 25, "M")]
    #[case(Chromosome::Autosome(3), 3, "3")]
    fn sentinel_round_trip(#[case] chromosome: Chromosome, #[case] index: u8, #[case] label: &str) {
        assert_eq!(chromosome.index(), index);
        assert_eq!(Chromosome::from_index(index), Ok(chromosome));
        assert_eq!(chromosome.to_string(), label);
        assert_eq!(index.to_string().parse(), Ok(chromosome));
    }

    #[test]
    fn order_follows_index() {
        let mut labels = vec![
            Chromosome::M,
            Chromosome::X,
            Chromosome::Autosome(10),
            Chromosome::Autosome(2),
            Chromosome::Y,
        ];
        labels.sort();
        let indices: Vec<u8> = labels.into_iter().map(Chromosome::index).collect();
        assert_eq!(indices, vec![2, 10, 23, 24, 25]);
    }
}
