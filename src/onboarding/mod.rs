// 家庭引导流程：客户端草稿状态机、提交校验、持久化顺序

pub mod sequencer;
pub mod validation;
pub mod wizard;

pub use sequencer::{InsertPlan, OnboardingReceipt, PersistenceError, persist};
pub use validation::{
    ChoreDraft, ChoreInput, OnboardingForm, SubmittedFields, ValidatedOnboarding, validate,
};
pub use wizard::{Action, Draft, Focus, Step, TransitionError, Wizard};
