//! Battery allocation rule.
//!
//! The batteries assigned to a device must never exceed its capacity. A write
//! that sets an assignment's quantity is admissible iff
//! `1 <= requested <= remaining`, where `remaining` is what the device can
//! still take once every *other* assignment on it is accounted for.

use std::fmt;

/// Inputs of one allocation decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocationRequest {
    /// Declared capacity of the target device.
    pub device_capacity: i32,
    /// Quantity currently assigned to the device, as measured by the caller.
    pub committed: i32,
    /// Share of `committed` held by the assignment being edited (0 when the
    /// assignment is new, or when `committed` already excludes it).
    pub previous_quantity: i32,
    /// Quantity the caller wants to set.
    pub requested_quantity: i32,
}

impl AllocationRequest {
    /// Request for a device whose committed sum already excludes the edited
    /// assignment.
    pub fn excluding_current(device_capacity: i32, others: i32, requested_quantity: i32) -> Self {
        Self {
            device_capacity,
            committed: others,
            previous_quantity: 0,
            requested_quantity,
        }
    }

    /// Live ceiling for `requested_quantity`. May be zero or negative.
    pub fn remaining(&self) -> i32 {
        self.device_capacity - self.committed + self.previous_quantity
    }
}

/// Rejection of an allocation, carrying the ceiling the caller must respect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityExceeded {
    pub remaining: i32,
}

impl fmt::Display for CapacityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No more than {} {} can be assigned to this device.",
            self.remaining,
            battery_noun(self.remaining)
        )
    }
}

impl std::error::Error for CapacityExceeded {}

/// "battery" for exactly one, "batteries" for anything else.
pub fn battery_noun(count: i32) -> &'static str {
    if count == 1 { "battery" } else { "batteries" }
}

/// Accepts `request` or reports the ceiling it broke.
///
/// Returns the accepted quantity.
pub fn validate_allocation(request: &AllocationRequest) -> Result<i32, CapacityExceeded> {
    let remaining = request.remaining();
    if (1..=remaining).contains(&request.requested_quantity) {
        Ok(request.requested_quantity)
    } else {
        Err(CapacityExceeded { remaining })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(capacity: i32, committed: i32, previous: i32, requested: i32) -> AllocationRequest {
        AllocationRequest {
            device_capacity: capacity,
            committed,
            previous_quantity: previous,
            requested_quantity: requested,
        }
    }

    #[test]
    fn fills_an_empty_device() {
        assert_eq!(validate_allocation(&request(4, 0, 0, 4)), Ok(4));
    }

    #[test]
    fn rejects_a_full_device() {
        let err = validate_allocation(&request(4, 4, 0, 1)).unwrap_err();
        assert_eq!(err.remaining, 0);
        assert_eq!(
            err.to_string(),
            "No more than 0 batteries can be assigned to this device."
        );
    }

    #[test]
    fn edit_gets_back_its_own_quantity() {
        // 3 assigned, 2 of which belong to the edited assignment.
        let req = request(4, 3, 2, 3);
        assert_eq!(req.remaining(), 3);
        assert_eq!(validate_allocation(&req), Ok(3));
    }

    #[test]
    fn single_slot_device_uses_singular_noun() {
        assert_eq!(validate_allocation(&request(1, 0, 0, 1)), Ok(1));

        let err = validate_allocation(&request(1, 0, 0, 2)).unwrap_err();
        assert_eq!(err, CapacityExceeded { remaining: 1 });
        assert_eq!(
            err.to_string(),
            "No more than 1 battery can be assigned to this device."
        );
    }

    #[test]
    fn ceiling_is_inclusive() {
        assert!(validate_allocation(&request(6, 2, 0, 4)).is_ok());
        assert_eq!(
            validate_allocation(&request(6, 2, 0, 5)),
            Err(CapacityExceeded { remaining: 4 })
        );
    }

    #[test]
    fn zero_is_never_admissible() {
        for capacity in 0..=10 {
            assert!(validate_allocation(&request(capacity, 0, 0, 0)).is_err());
        }
    }

    #[test]
    fn negative_requests_are_rejected() {
        assert!(validate_allocation(&request(10, 0, 0, -1)).is_err());
    }

    #[test]
    fn negative_ceiling_is_reported_as_is() {
        let err = validate_allocation(&request(2, 5, 0, 1)).unwrap_err();
        assert_eq!(err.remaining, -3);
        assert_eq!(
            err.to_string(),
            "No more than -3 batteries can be assigned to this device."
        );
    }

    #[test]
    fn plural_for_everything_but_one() {
        assert_eq!(battery_noun(-1), "batteries");
        assert_eq!(battery_noun(0), "batteries");
        assert_eq!(battery_noun(1), "battery");
        assert_eq!(battery_noun(2), "batteries");
        assert_eq!(battery_noun(10), "batteries");
    }

    #[test]
    fn excluding_current_matches_inclusive_form() {
        // Device of 5 holding 2 (edited) + 2 (other).
        let inclusive = request(5, 4, 2, 3);
        let exclusive = AllocationRequest::excluding_current(5, 2, 3);
        assert_eq!(inclusive.remaining(), exclusive.remaining());
        assert_eq!(validate_allocation(&inclusive), validate_allocation(&exclusive));
    }

    #[test]
    fn accepts_exactly_the_admissible_range() {
        for capacity in 0..=10 {
            for previous in 0..=capacity {
                for others in 0..=(capacity - previous) {
                    let committed = others + previous;
                    for requested in 0..=12 {
                        let req = request(capacity, committed, previous, requested);
                        let admissible = requested >= 1 && requested <= capacity - others;
                        assert_eq!(
                            validate_allocation(&req).is_ok(),
                            admissible,
                            "capacity={capacity} committed={committed} previous={previous} requested={requested}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn unchanged_assignment_revalidates() {
        for capacity in 1..=10 {
            for previous in 1..=capacity {
                for others in 0..=(capacity - previous) {
                    let committed = others + previous;
                    let req = request(capacity, committed, previous, previous);
                    assert_eq!(validate_allocation(&req), Ok(previous));
                }
            }
        }
    }
}
