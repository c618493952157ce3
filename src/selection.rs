use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// A `start:stop:step` range over index positions.
///
/// Bounds follow ordered-sequence slicing: negative values count from the
/// end, out-of-range values are clamped rather than rejected, and a negative
/// step walks backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: isize,
}

impl Default for Slice {
    fn default() -> Self {
        Self::full()
    }
}

impl Slice {
    pub const fn new(
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    ) -> Self {
        Self { start, stop, step }
    }

    /// `start..stop` with a step of one.
    pub const fn range(start: isize, stop: isize) -> Self {
        Self::new(Some(start), Some(stop), 1)
    }

    /// Every position, in order.
    pub const fn full() -> Self {
        Self::new(None, None, 1)
    }

    /// Resolve this slice against a collection of `len` items, returning
    /// the selected positions in visiting order.
    pub fn positions(&self, len: usize) -> Result<Vec<usize>> {
        if self.step == 0 {
            return Err(Error::InvalidSelection(
                "slice step cannot be zero".to_string(),
            ));
        }

        let len = len as isize;
        let step = self.step;
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };

        let clamp = |bound: Option<isize>, default: isize| match bound {
            None => default,
            Some(b) if b < 0 => (b + len).max(lower),
            Some(b) => b.min(upper),
        };

        let (start, stop) = if step < 0 {
            (clamp(self.start, upper), clamp(self.stop, lower))
        } else {
            (clamp(self.start, lower), clamp(self.stop, upper))
        };

        let mut positions = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            positions.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
        Ok(positions)
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{start}")?;
        }
        f.write_str(":")?;
        if let Some(stop) = self.stop {
            write!(f, "{stop}")?;
        }
        if self.step != 1 {
            write!(f, ":{}", self.step)?;
        }
        Ok(())
    }
}

/// Resolve a single, possibly negative, position against `len`.
pub fn resolve_position(position: isize, len: usize) -> Result<usize> {
    let resolved = if position < 0 {
        position + len as isize
    } else {
        position
    };

    if resolved < 0 || resolved >= len as isize {
        return Err(Error::RecordNotFound { position, len });
    }
    Ok(resolved as usize)
}

/// Either a single position or a slice of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Position(isize),
    Slice(Slice),
}

impl From<isize> for Selection {
    fn from(position: isize) -> Self {
        Self::Position(position)
    }
}

impl From<Slice> for Selection {
    fn from(slice: Slice) -> Self {
        Self::Slice(slice)
    }
}

impl FromStr for Selection {
    type Err = Error;

    /// Parses `"3"`, `"-1"`, `"1:5"`, `":10"`, `"::2"`, `"5:1:-1"`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if !s.contains(':') {
            return parse_bound(s).map(Self::Position);
        }

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() > 3 {
            return Err(Error::InvalidSelection(format!(
                "too many ':' in '{s}'"
            )));
        }

        let optional = |part: &str| -> Result<Option<isize>> {
            if part.trim().is_empty() {
                Ok(None)
            } else {
                parse_bound(part).map(Some)
            }
        };

        let start = optional(parts[0])?;
        let stop = optional(parts[1])?;
        let step = match parts.get(2) {
            Some(part) => optional(part)?.unwrap_or(1),
            None => 1,
        };

        Ok(Self::Slice(Slice::new(start, stop, step)))
    }
}

fn parse_bound(s: &str) -> Result<isize> {
    s.trim().parse().map_err(|_| {
        Error::InvalidSelection(format!("'{s}' is not an integer"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_range() {
        assert_eq!(Slice::range(1, 4).positions(10).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn empty_range_is_empty() {
        assert!(Slice::range(1, 1).positions(5).unwrap().is_empty());
        assert!(Slice::range(4, 2).positions(5).unwrap().is_empty());
    }

    #[test]
    fn full_range_covers_everything() {
        assert_eq!(Slice::full().positions(3).unwrap(), vec![0, 1, 2]);
        assert!(Slice::full().positions(0).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_bounds_are_clamped() {
        assert_eq!(
            Slice::range(-100, 100).positions(3).unwrap(),
            vec![0, 1, 2]
        );
        assert!(Slice::range(7, 9).positions(3).unwrap().is_empty());
    }

    #[test]
    fn negative_bounds_count_from_end() {
        assert_eq!(
            Slice::new(Some(-2), None, 1).positions(5).unwrap(),
            vec![3, 4]
        );
        assert_eq!(
            Slice::new(None, Some(-3), 1).positions(5).unwrap(),
            vec![0, 1]
        );
    }

    #[test]
    fn stepped_and_reversed() {
        assert_eq!(
            Slice::new(None, None, 2).positions(5).unwrap(),
            vec![0, 2, 4]
        );
        assert_eq!(
            Slice::new(None, None, -1).positions(4).unwrap(),
            vec![3, 2, 1, 0]
        );
        assert_eq!(
            Slice::new(Some(4), Some(1), -2).positions(6).unwrap(),
            vec![4, 2]
        );
        assert_eq!(
            Slice::new(Some(100), None, -3).positions(5).unwrap(),
            vec![4, 1]
        );
    }

    #[test]
    fn huge_steps_stop_after_one_position() {
        assert_eq!(
            Slice::new(Some(1), None, isize::MAX).positions(3).unwrap(),
            vec![1]
        );
        assert_eq!(
            Slice::new(None, None, isize::MIN).positions(3).unwrap(),
            vec![2]
        );

        let parsed: Selection = "1::9223372036854775807".parse().unwrap();
        match parsed {
            Selection::Slice(slice) => {
                assert_eq!(slice.positions(3).unwrap(), vec![1])
            }
            other => panic!("expected a slice, got {other:?}"),
        }
    }

    #[test]
    fn zero_step_is_rejected() {
        let err = Slice::new(None, None, 0).positions(3).unwrap_err();
        assert!(matches!(err, Error::InvalidSelection(_)));
    }

    #[test]
    fn single_positions() {
        assert_eq!(resolve_position(0, 3).unwrap(), 0);
        assert_eq!(resolve_position(-1, 3).unwrap(), 2);
        assert!(matches!(
            resolve_position(3, 3),
            Err(Error::RecordNotFound { position: 3, len: 3 })
        ));
        assert!(matches!(
            resolve_position(-4, 3),
            Err(Error::RecordNotFound { position: -4, len: 3 })
        ));
        assert!(resolve_position(0, 0).is_err());
    }

    #[test]
    fn parse_selections() {
        assert_eq!("3".parse::<Selection>().unwrap(), Selection::Position(3));
        assert_eq!(
            "-1".parse::<Selection>().unwrap(),
            Selection::Position(-1)
        );
        assert_eq!(
            "1:5".parse::<Selection>().unwrap(),
            Selection::Slice(Slice::range(1, 5))
        );
        assert_eq!(
            ":10".parse::<Selection>().unwrap(),
            Selection::Slice(Slice::new(None, Some(10), 1))
        );
        assert_eq!(
            "::2".parse::<Selection>().unwrap(),
            Selection::Slice(Slice::new(None, None, 2))
        );
        assert_eq!(
            "5:1:-1".parse::<Selection>().unwrap(),
            Selection::Slice(Slice::new(Some(5), Some(1), -1))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("abc".parse::<Selection>().is_err());
        assert!("1:2:3:4".parse::<Selection>().is_err());
        assert!("1:x".parse::<Selection>().is_err());
    }

    #[test]
    fn display_matches_parse_syntax() {
        assert_eq!(Slice::range(1, 5).to_string(), "1:5");
        assert_eq!(Slice::new(None, None, -1).to_string(), "::-1");
        assert_eq!(Slice::new(Some(2), None, 3).to_string(), "2::3");
    }
}
