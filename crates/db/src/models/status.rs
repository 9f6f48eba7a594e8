//! Status helper enums mapping to SMALLSERIAL lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up the variant for a database status ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Availability block status.
    BlockStatus {
        Available = 1,
        Reserved = 2,
        /// Withdrawn by building staff; never offered.
        Blocked = 3,
    }
}

define_status_enum! {
    /// Booking lifecycle status.
    BookingStatus {
        Pending = 1,
        Confirmed = 2,
        Cancelled = 3,
        Completed = 4,
        NoShow = 5,
    }
}

define_status_enum! {
    /// Booking payment status.
    PaymentStatus {
        Pending = 1,
        Paid = 2,
        Failed = 3,
        Refunded = 4,
    }
}

define_status_enum! {
    /// Settlement payout status.
    PayoutStatus {
        Pending = 1,
        Finalized = 2,
        Paid = 3,
    }
}
