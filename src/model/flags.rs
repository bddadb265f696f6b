//! Bit packed boolean properties of entities.
//!
//! The file format stores boolean properties as individual attributes, but an entity keeps them packed in a [`FlagSet`]. The raw bits never leave this module; entities expose one named getter and setter pair per property, and a setter changes only its own bit.

use std::{fmt, hash::Hash, marker::PhantomData};

/// A boolean property which can be stored in a [`FlagSet`].
pub trait Flag: Copy + fmt::Debug + 'static {
    /// Every flag of this kind, in declaration order.
    const ALL: &'static [Self];

    /// The position of this flag in the set, must be less than 16 and unique.
    fn position(self) -> u8;
}

/// A set of flags of kind `F`.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent, bound = "")
)]
pub struct FlagSet<F> {
    bits: u16,
    #[cfg_attr(feature = "serde", serde(skip))]
    _flag: PhantomData<fn() -> F>,
}

impl<F: Flag> FlagSet<F> {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bits: 0,
            _flag: PhantomData,
        }
    }

    const fn mask(flag: u8) -> u16 {
        1 << flag
    }

    /// Returns whether `flag` is set.
    #[must_use]
    pub fn contains(&self, flag: F) -> bool {
        self.bits & Self::mask(flag.position()) != 0
    }

    /// Sets or clears `flag`, leaving every other flag as it was.
    pub fn set(&mut self, flag: F, value: bool) {
        let bits = self.bits;
        self.bits = if value {
            bits | Self::mask(flag.position())
        } else {
            bits & !Self::mask(flag.position())
        };
    }

    /// Returns whether no flag is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterates the flags which are set, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        F::ALL.iter().copied().filter(|&flag| self.contains(flag))
    }
}

impl<F: Flag> Default for FlagSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Clone for FlagSet<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for FlagSet<F> {}

impl<F> PartialEq for FlagSet<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F> Eq for FlagSet<F> {}

impl<F> Hash for FlagSet<F> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<F: Flag> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<F: Flag> FromIterator<F> for FlagSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut set = Self::new();
        for flag in iter {
            set.set(flag, true);
        }
        set
    }
}

/// Declares a flag enum and implements [`Flag`] for it.
macro_rules! flags {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $pos:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )*
        }

        impl $crate::model::flags::Flag for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),*];

            fn position(self) -> u8 {
                match self {
                    $(Self::$variant => $pos,)*
                }
            }
        }
    };
}

/// Generates named getter and setter pairs over the `flags` field of an entity.
macro_rules! flag_accessors {
    ($flag:ident { $( $(#[$meta:meta])* $get:ident / $set:ident => $variant:ident; )* }) => {
        $(
            $(#[$meta])*
            #[must_use]
            pub fn $get(&self) -> bool {
                self.flags.contains($flag::$variant)
            }

            #[doc = concat!("Sets the property read by [`Self::", stringify!($get), "`].")]
            pub fn $set(&mut self, value: bool) {
                self.flags.set($flag::$variant, value);
            }
        )*
    };
}

pub(crate) use {flag_accessors, flags};

#[cfg(test)]
mod tests {
    use super::*;

    flags! {
        enum Sample {
            A = 0,
            B = 1,
            C = 15,
        }
    }

    #[test]
    fn set_keeps_other_bits() {
        let mut set = FlagSet::<Sample>::new();
        set.set(Sample::A, true);
        set.set(Sample::C, true);
        set.set(Sample::B, true);
        set.set(Sample::B, false);
        assert!(set.contains(Sample::A));
        assert!(!set.contains(Sample::B));
        assert!(set.contains(Sample::C));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Sample::A, Sample::C]);
    }

    #[test]
    fn collect_and_clear() {
        let mut set: FlagSet<Sample> = [Sample::B, Sample::C].into_iter().collect();
        assert!(!set.is_empty());
        set.set(Sample::B, false);
        set.set(Sample::C, false);
        assert!(set.is_empty());
        assert_eq!(set, FlagSet::default());
    }
}
