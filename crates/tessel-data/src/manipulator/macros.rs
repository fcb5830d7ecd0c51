/// Generate the ordering impls of a mutable trait from its `cmp_key`
/// method, and its immutable counterpart as a newtype over the same
/// fields.
///
/// The mutable type must provide `fn cmp_key(&self) -> impl Ord` as an
/// inherent method and implement `ValueContainer`.
macro_rules! trait_pair {
    ($mutable:ident, $immutable:ident) => {
        impl PartialEq for $mutable {
            fn eq(&self, other: &Self) -> bool {
                self.cmp_key() == other.cmp_key()
            }
        }

        impl Eq for $mutable {}

        impl PartialOrd for $mutable {
            fn partial_cmp(&self, other: &Self) -> Option<::std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $mutable {
            fn cmp(&self, other: &Self) -> ::std::cmp::Ordering {
                self.cmp_key().cmp(&other.cmp_key())
            }
        }

        #[doc = concat!("Immutable form of [`", stringify!($mutable), "`].")]
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $immutable($mutable);

        impl $immutable {
            /// Borrow the underlying field layout.
            pub fn as_data(&self) -> &$mutable {
                &self.0
            }
        }

        impl From<$mutable> for $immutable {
            fn from(data: $mutable) -> Self {
                Self(data)
            }
        }

        impl $crate::manipulator::ValueContainer for $immutable {
            const TRAIT: $crate::manipulator::TraitType =
                <$mutable as $crate::manipulator::ValueContainer>::TRAIT;

            fn declared_keys() -> &'static [::tessel_types::KeyDescriptor] {
                <$mutable as $crate::manipulator::ValueContainer>::declared_keys()
            }

            fn value_of(&self, key: ::tessel_types::KeyId) -> Option<::tessel_value::AnyValue> {
                self.0.value_of(key)
            }

            fn to_container(&self) -> ::tessel_types::DataContainer {
                self.0.to_container()
            }
        }

        impl $crate::manipulator::ImmutableDataManipulator for $immutable {
            type Mutable = $mutable;

            fn as_mutable(&self) -> $mutable {
                self.0.clone()
            }
        }
    };
}

pub(crate) use trait_pair;
