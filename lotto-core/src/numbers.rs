//! Validated 6/45 number sets.
//!
//! A [`NumberSet`] is the value type shared by tickets and draws: exactly six
//! distinct numbers in `1..=45`, kept in ascending order so two sets built from
//! the same numbers in a different order compare equal.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;
use thiserror::Error;

pub const PICK_COUNT: usize = 6;
pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 45;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberSetError {
    #[error("expected 6 numbers, got {found}")]
    InvalidCount { found: usize },

    #[error("'{token}' is not a number")]
    NotNumeric { token: String },

    #[error("{value} is outside 1..=45")]
    OutOfRange { value: i64 },

    #[error("{value} appears more than once")]
    DuplicateValue { value: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<u8>")]
pub struct NumberSet([u8; PICK_COUNT]);

impl NumberSet {
    /// Validate raw integers. Checks run count, range, then duplicates.
    pub fn from_slice(values: &[i64]) -> Result<Self, NumberSetError> {
        if values.len() != PICK_COUNT {
            return Err(NumberSetError::InvalidCount {
                found: values.len(),
            });
        }

        let mut numbers = [0u8; PICK_COUNT];
        for (slot, &value) in numbers.iter_mut().zip(values) {
            *slot = checked_number(value)?;
        }

        numbers.sort_unstable();
        if let Some(pair) = numbers.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(NumberSetError::DuplicateValue { value: pair[0] });
        }

        Ok(Self(numbers))
    }

    /// Quick pick: six numbers sampled without replacement.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut numbers = [0u8; PICK_COUNT];
        let picked = rand::seq::index::sample(rng, MAX_NUMBER as usize, PICK_COUNT);
        for (slot, index) in numbers.iter_mut().zip(picked.into_iter()) {
            *slot = index as u8 + MIN_NUMBER;
        }
        numbers.sort_unstable();
        Self(numbers)
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }

    /// Size of the intersection with `other`.
    pub fn matches(&self, other: &NumberSet) -> usize {
        self.0.iter().filter(|n| other.contains(**n)).count()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Every number in `1..=45` that is not part of this set, ascending.
    pub fn complement(&self) -> Vec<u8> {
        (MIN_NUMBER..=MAX_NUMBER)
            .filter(|n| !self.contains(*n))
            .collect()
    }
}

/// Range check shared by set members and bonus numbers.
pub fn checked_number(value: i64) -> Result<u8, NumberSetError> {
    if (MIN_NUMBER as i64..=MAX_NUMBER as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(NumberSetError::OutOfRange { value })
    }
}

impl FromStr for NumberSet {
    type Err = NumberSetError;

    /// Parses comma separated input such as `"1, 5, 12, 20, 33, 42"`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().is_empty() {
            return Err(NumberSetError::InvalidCount { found: 0 });
        }

        let tokens: Vec<&str> = input.split(',').map(str::trim).collect();
        if tokens.len() != PICK_COUNT {
            return Err(NumberSetError::InvalidCount {
                found: tokens.len(),
            });
        }

        let values = tokens
            .iter()
            .map(|token| match token.parse::<i64>() {
                Ok(value) => Ok(value),
                // integers too wide for i64 are still integers, just out of range
                Err(e) => match e.kind() {
                    IntErrorKind::PosOverflow => Ok(i64::MAX),
                    IntErrorKind::NegOverflow => Ok(i64::MIN),
                    _ => Err(NumberSetError::NotNumeric {
                        token: token.to_string(),
                    }),
                },
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_slice(&values)
    }
}

impl TryFrom<Vec<i64>> for NumberSet {
    type Error = NumberSetError;

    fn try_from(values: Vec<i64>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
    }
}

impl From<NumberSet> for Vec<u8> {
    fn from(set: NumberSet) -> Self {
        set.0.to_vec()
    }
}

impl fmt::Display for NumberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_sorts_and_trims() {
        let set: NumberSet = " 42, 5,12 ,1,33,20".parse().unwrap();
        assert_eq!(set.as_slice(), &[1, 5, 12, 20, 33, 42]);
        assert_eq!(set.to_string(), "1,5,12,20,33,42");
        assert_eq!(set, "1,5,12,20,33,42".parse::<NumberSet>().unwrap());
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(
            "".parse::<NumberSet>(),
            Err(NumberSetError::InvalidCount { found: 0 })
        );
        assert_eq!(
            "1,2,3,4,5".parse::<NumberSet>(),
            Err(NumberSetError::InvalidCount { found: 5 })
        );
        assert_eq!(
            "1,2,3,4,5,6,7".parse::<NumberSet>(),
            Err(NumberSetError::InvalidCount { found: 7 })
        );
        assert_eq!(
            "1,2,x,4,5,6".parse::<NumberSet>(),
            Err(NumberSetError::NotNumeric {
                token: "x".to_string()
            })
        );
        assert_eq!(
            "0,2,3,4,5,6".parse::<NumberSet>(),
            Err(NumberSetError::OutOfRange { value: 0 })
        );
        assert_eq!(
            "1,2,3,4,5,46".parse::<NumberSet>(),
            Err(NumberSetError::OutOfRange { value: 46 })
        );
        assert_eq!(
            "1,2,3,4,5,5".parse::<NumberSet>(),
            Err(NumberSetError::DuplicateValue { value: 5 })
        );
    }

    #[test]
    fn test_oversized_integers_are_out_of_range() {
        assert_eq!(
            "1,2,3,4,5,99999999999999999999".parse::<NumberSet>(),
            Err(NumberSetError::OutOfRange { value: i64::MAX })
        );
        assert_eq!(
            "-99999999999999999999,2,3,4,5,6".parse::<NumberSet>(),
            Err(NumberSetError::OutOfRange { value: i64::MIN })
        );
        // still a numeric check first, so garbage later in the list wins
        assert_eq!(
            "99999999999999999999,2,3,4,5,x".parse::<NumberSet>(),
            Err(NumberSetError::NotNumeric {
                token: "x".to_string()
            })
        );
    }

    #[test]
    fn test_count_checked_before_content() {
        // a short list of garbage still reports the count first
        assert_eq!(
            "a,b".parse::<NumberSet>(),
            Err(NumberSetError::InvalidCount { found: 2 })
        );
    }

    #[test]
    fn test_random_sets_are_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let set = NumberSet::random(&mut rng);
            let values: Vec<i64> = set.iter().map(i64::from).collect();
            assert_eq!(NumberSet::from_slice(&values), Ok(set));
        }
    }

    #[test]
    fn test_matches_and_complement() {
        let a: NumberSet = "1,2,3,4,5,6".parse().unwrap();
        let b: NumberSet = "4,5,6,7,8,9".parse().unwrap();
        assert_eq!(a.matches(&b), 3);
        assert_eq!(a.matches(&a), 6);

        let rest = a.complement();
        assert_eq!(rest.len(), 39);
        assert!(rest.iter().all(|n| !a.contains(*n)));
    }

    #[test]
    fn test_serde_validates() {
        let set: NumberSet = serde_json::from_str("[6,5,4,3,2,1]").unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[1,2,3,4,5,6]");
        assert!(serde_json::from_str::<NumberSet>("[1,1,2,3,4,5]").is_err());
    }
}
