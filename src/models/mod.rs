pub mod area;
pub mod chore;
pub mod household;
pub mod user;

pub use area::{Area, AreaChore, NewArea, NewAreaChore};
pub use chore::{Chore, Frequency, NewChore};
pub use household::{AreaOverview, Household, HouseholdOverview, NewHousehold};
pub use user::{NewUser, User};
