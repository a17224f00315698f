//! # 实体模块
//!
//! ## 设计思路
//!
//! 三类带图片字段的实体（分类 / 菜品 / 用户资料）各有：
//! 专属的存储路径前缀、一对创建 / 更新端点、一份图片字段配置。
//! 把这些差异集中到 `EntityKind`，表单层只面向统一接口。
//!
//! 标量字段由各自的 Upsert DTO 携带，DTO 负责必填校验并
//! 导出统一的 `ScalarField` 列表供载荷构建使用。

use crate::image_form::{ImageFieldConfig, ImageFieldError};
use crate::payload::ScalarField;

/// 实体种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Category,
    MenuItem,
    Profile,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Category => "category",
            EntityKind::MenuItem => "menu_item",
            EntityKind::Profile => "profile",
        }
    }

    /// 实体专属的服务端存储路径前缀。
    pub fn stored_path_prefix(&self) -> &'static str {
        match self {
            EntityKind::Category => "/CategoryImages/",
            EntityKind::MenuItem => "/MenuImages/",
            EntityKind::Profile => "/UserImages/",
        }
    }

    /// 创建端点路径（`POST`）。
    pub fn create_path(&self) -> &'static str {
        match self {
            EntityKind::Category => "/api/category",
            EntityKind::MenuItem => "/api/menuitem",
            EntityKind::Profile => "/api/profile",
        }
    }

    /// 更新端点路径（`PUT`）。
    pub fn update_path(&self, id: u64) -> String {
        format!("{}/{}", self.create_path(), id)
    }

    /// 实体专属图片字段配置（前缀白名单 + 默认形态开关）。
    pub fn image_field_config(&self) -> ImageFieldConfig {
        ImageFieldConfig::with_prefixes([self.stored_path_prefix()])
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 分类表单的标量字段。
#[derive(Debug, Clone)]
pub struct CategoryUpsert {
    pub name: String,
    pub is_active: bool,
}

impl CategoryUpsert {
    pub fn validate(&self) -> Result<(), ImageFieldError> {
        if self.name.trim().is_empty() {
            return Err(ImageFieldError::Validation("分类名称不能为空".to_string()));
        }
        Ok(())
    }

    pub fn scalar_fields(&self) -> Vec<ScalarField> {
        vec![
            ScalarField::text("name", self.name.clone()),
            ScalarField::flag("isActive", self.is_active),
        ]
    }
}

/// 菜品表单的标量字段。
#[derive(Debug, Clone)]
pub struct MenuItemUpsert {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i64,
    pub category_id: i64,
    pub is_active: bool,
}

impl MenuItemUpsert {
    pub fn validate(&self) -> Result<(), ImageFieldError> {
        if self.name.trim().is_empty() {
            return Err(ImageFieldError::Validation("菜品名称不能为空".to_string()));
        }
        if self.price <= 0.0 {
            return Err(ImageFieldError::Validation("菜品价格必须大于 0".to_string()));
        }
        if self.quantity < 0 {
            return Err(ImageFieldError::Validation("菜品数量不能为负".to_string()));
        }
        if self.category_id <= 0 {
            return Err(ImageFieldError::Validation("必须选择所属分类".to_string()));
        }
        Ok(())
    }

    pub fn scalar_fields(&self) -> Vec<ScalarField> {
        vec![
            ScalarField::text("name", self.name.clone()),
            ScalarField::text("description", self.description.clone()),
            ScalarField::number("price", self.price),
            ScalarField::integer("quantity", self.quantity),
            ScalarField::integer("categoryId", self.category_id),
            ScalarField::flag("isActive", self.is_active),
        ]
    }
}

/// 用户资料表单的标量字段。
#[derive(Debug, Clone)]
pub struct ProfileUpsert {
    pub name: String,
    pub phone_number: String,
}

impl ProfileUpsert {
    pub fn validate(&self) -> Result<(), ImageFieldError> {
        if self.name.trim().is_empty() {
            return Err(ImageFieldError::Validation("用户名称不能为空".to_string()));
        }
        Ok(())
    }

    pub fn scalar_fields(&self) -> Vec<ScalarField> {
        vec![
            ScalarField::text("name", self.name.clone()),
            ScalarField::text("phoneNumber", self.phone_number.clone()),
        ]
    }
}
