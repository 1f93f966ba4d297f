//! 引导向导的草稿状态机
//!
//! 状态只在一次交互会话内存在，按用户操作顺序同步变更。
//! `Wizard::apply` 是纯函数：消费旧状态，返回新状态或拒绝该操作。

use std::collections::BTreeMap;

use thiserror::Error;

use super::validation::{ChoreInput, OnboardingForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Household,
    Areas,
    Chores,
    Check,
    Submitted,
}

/// 当前应获得焦点的输入框
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    HouseholdName,
    AreaName,
    ChoreName,
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    EditHouseholdName(String),
    EditAreaName(String),
    EditChoreName(String),
    EditChoreDescription(String),
    GoToAreas,
    AddAnotherArea,
    GoToChores,
    AddAnotherChore,
    GoToAreasFromChores,
    GoToCheck,
    Submit,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::EditHouseholdName(_) => "edit household name",
            Action::EditAreaName(_) => "edit area name",
            Action::EditChoreName(_) => "edit chore name",
            Action::EditChoreDescription(_) => "edit chore description",
            Action::GoToAreas => "go to areas",
            Action::AddAnotherArea => "add another area",
            Action::GoToChores => "go to chores",
            Action::AddAnotherChore => "add another chore",
            Action::GoToAreasFromChores => "another area",
            Action::GoToCheck => "check",
            Action::Submit => "submit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {action} during the {step:?} step")]
    NotAvailable { step: Step, action: &'static str },
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),
    #[error("failed to encode draft: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    pub household_name: String,
    pub area_name: String,
    pub chore_name: String,
    pub chore_description: String,
}

/// 尚未持久化的引导数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub household_name: String,
    pub areas: BTreeMap<String, Vec<String>>,
    pub chores: Vec<ChoreInput>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    pub step: Step,
    pub focus: Focus,
    pub inputs: Inputs,
    pub draft: Draft,
    /// 本次会话已添加的家务，用于界面回显
    pub reviewed_chores: Vec<ChoreInput>,
    payload: Option<OnboardingForm>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: Step::Household,
            focus: Focus::HouseholdName,
            inputs: Inputs::default(),
            draft: Draft::default(),
            reviewed_chores: Vec::new(),
            payload: None,
        }
    }

    /// 提交后生成的表单数据
    pub fn payload(&self) -> Option<&OnboardingForm> {
        self.payload.as_ref()
    }

    pub fn apply(mut self, action: Action) -> Result<Self, TransitionError> {
        let not_available = TransitionError::NotAvailable {
            step: self.step,
            action: action.name(),
        };

        match (self.step, action) {
            (Step::Household, Action::EditHouseholdName(value)) => {
                self.inputs.household_name = value;
            }
            (Step::Areas, Action::EditAreaName(value)) => {
                self.inputs.area_name = value;
            }
            (Step::Chores, Action::EditChoreName(value)) => {
                self.inputs.chore_name = value;
            }
            (Step::Chores, Action::EditChoreDescription(value)) => {
                // 没有家务名时备注输入框不可用
                require("choreName", &self.inputs.chore_name)?;
                self.inputs.chore_description = value;
            }
            (Step::Household, Action::GoToAreas) => {
                require("householdName", &self.inputs.household_name)?;
                self.draft.household_name = self.inputs.household_name.clone();
                self.step = Step::Areas;
                self.focus = Focus::AreaName;
            }
            (Step::Areas, Action::AddAnotherArea) => {
                require("areaName", &self.inputs.area_name)?;
                let area = std::mem::take(&mut self.inputs.area_name);
                self.draft.areas.entry(area).or_default();
                self.focus = Focus::AreaName;
            }
            (Step::Areas, Action::GoToChores) => {
                require("areaName", &self.inputs.area_name)?;
                self.draft
                    .areas
                    .entry(self.inputs.area_name.clone())
                    .or_default();
                self.step = Step::Chores;
                self.focus = Focus::ChoreName;
            }
            (Step::Chores, Action::AddAnotherChore) => {
                require("choreName", &self.inputs.chore_name)?;
                self.flush_pending_chore();
                self.focus = Focus::ChoreName;
            }
            (Step::Chores, Action::GoToAreasFromChores) => {
                self.flush_pending_chore();
                self.inputs.area_name.clear();
                self.step = Step::Areas;
                self.focus = Focus::AreaName;
            }
            (Step::Chores, Action::GoToCheck) => {
                self.flush_pending_chore();
                self.inputs.area_name.clear();
                self.step = Step::Check;
                self.focus = Focus::Nothing;
            }
            (Step::Check, Action::Submit) => {
                self.payload = Some(self.encode()?);
                self.step = Step::Submitted;
                self.focus = Focus::Nothing;
            }
            _ => return Err(not_available),
        }

        Ok(self)
    }

    /// 把输入框中的家务写入当前区域和家务列表，然后清空家务输入。
    /// 有名称和备注时写完整记录，只有名称时写名称，没有名称时什么都不写
    fn flush_pending_chore(&mut self) {
        let name = std::mem::take(&mut self.inputs.chore_name);
        let description = std::mem::take(&mut self.inputs.chore_description);

        if name.is_empty() {
            return;
        }

        let record = ChoreInput {
            name: Some(name.clone()),
            description: (!description.is_empty()).then_some(description),
            ..ChoreInput::default()
        };

        self.draft
            .areas
            .entry(self.inputs.area_name.clone())
            .or_default()
            .push(name);
        self.draft.chores.push(record.clone());
        self.reviewed_chores.push(record);
    }

    fn encode(&self) -> Result<OnboardingForm, TransitionError> {
        let areas = serde_json::to_string(&self.draft.areas)
            .map_err(|e| TransitionError::Encode(e.to_string()))?;
        let chores = serde_json::to_string(&self.draft.chores)
            .map_err(|e| TransitionError::Encode(e.to_string()))?;

        Ok(OnboardingForm {
            household_name: self.draft.household_name.clone(),
            areas,
            chores,
        })
    }
}

fn require(field: &'static str, value: &str) -> Result<(), TransitionError> {
    if value.is_empty() {
        Err(TransitionError::EmptyInput(field))
    } else {
        Ok(())
    }
}
