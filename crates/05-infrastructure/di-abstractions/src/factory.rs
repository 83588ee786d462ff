//! 组件工厂抽象接口
//!
//! 提供者就是普通函数或闭包：参数是依赖（`Rc<T>`），返回值是产出的组件。
//! 依赖列表在注册时由函数签名静态推导，不需要运行时反射。

use infrastructure_common::{Closable, Component, TypeInfo};
use std::any::Any;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

/// 提供者返回的错误类型
pub type ProviderError = Box<dyn Error + Send + Sync>;

/// 类型擦除后的工厂函数
pub type FactoryFn = Box<dyn Fn(&[Instance]) -> Result<Instance, ProviderError>>;

/// 容器持有的组件实例
///
/// 同一个 `Rc` 分配同时以 `Any`（用于还原具体类型）和 [`Component`]
/// （用于查询关闭能力）两种视图保存。
#[derive(Clone)]
pub struct Instance {
    value: Rc<dyn Any>,
    component: Rc<dyn Component>,
}

impl Instance {
    /// 包装新构造的组件
    pub fn new<T: Component>(component: T) -> Self {
        Self::from_rc(Rc::new(component))
    }

    /// 包装已有的共享组件
    pub fn from_rc<T: Component>(component: Rc<T>) -> Self {
        Self {
            value: component.clone(),
            component,
        }
    }

    /// 还原为具体类型
    pub fn downcast<T: Component>(&self) -> Option<Rc<T>> {
        self.value.clone().downcast::<T>().ok()
    }

    /// 获取可关闭能力
    pub fn as_closable(&self) -> Option<&dyn Closable> {
        self.component.as_closable()
    }

    /// 是否为同一个实例
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("closable", &self.as_closable().is_some())
            .finish_non_exhaustive()
    }
}

/// 无错误的提供者
///
/// 为 `Fn(Rc<A1>, ..., Rc<An>) -> T` 自动实现，`Args` 为依赖类型元组。
pub trait Provide<Args>: 'static {
    /// 产出的组件类型
    type Output: Component;

    /// 依赖类型列表，按参数声明顺序
    fn dependencies() -> Vec<TypeInfo>;

    /// 使用已解析的依赖调用提供者
    fn invoke(&self, arguments: &[Instance]) -> Result<Self::Output, ProviderError>;
}

/// 可能返回错误的提供者
///
/// 为 `Fn(Rc<A1>, ..., Rc<An>) -> Result<T, E>` 自动实现。
pub trait TryProvide<Args>: 'static {
    /// 产出的组件类型
    type Output: Component;

    /// 依赖类型列表，按参数声明顺序
    fn dependencies() -> Vec<TypeInfo>;

    /// 使用已解析的依赖调用提供者
    fn try_invoke(&self, arguments: &[Instance]) -> Result<Self::Output, ProviderError>;
}

/// 从参数列表中取出下一个依赖
fn next_argument<'a, T: Component>(
    arguments: &mut impl Iterator<Item = &'a Instance>,
) -> Result<Rc<T>, ProviderError> {
    arguments
        .next()
        .and_then(Instance::downcast::<T>)
        .ok_or_else(|| format!("依赖参数不匹配: {}", std::any::type_name::<T>()).into())
}

macro_rules! impl_provider_fn {
    ($($arg:ident),*) => {
        impl<F, R, $($arg,)*> Provide<($($arg,)*)> for F
        where
            F: Fn($(Rc<$arg>),*) -> R + 'static,
            R: Component,
            $($arg: Component,)*
        {
            type Output = R;

            fn dependencies() -> Vec<TypeInfo> {
                vec![$(TypeInfo::of::<$arg>()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn invoke(&self, arguments: &[Instance]) -> Result<R, ProviderError> {
                let mut arguments = arguments.iter();
                $(let $arg = next_argument::<$arg>(&mut arguments)?;)*
                Ok(self($($arg),*))
            }
        }

        impl<F, R, E, $($arg,)*> TryProvide<($($arg,)*)> for F
        where
            F: Fn($(Rc<$arg>),*) -> Result<R, E> + 'static,
            R: Component,
            E: Into<ProviderError>,
            $($arg: Component,)*
        {
            type Output = R;

            fn dependencies() -> Vec<TypeInfo> {
                vec![$(TypeInfo::of::<$arg>()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn try_invoke(&self, arguments: &[Instance]) -> Result<R, ProviderError> {
                let mut arguments = arguments.iter();
                $(let $arg = next_argument::<$arg>(&mut arguments)?;)*
                self($($arg),*).map_err(Into::into)
            }
        }
    };
}

impl_provider_fn!();
impl_provider_fn!(A1);
impl_provider_fn!(A1, A2);
impl_provider_fn!(A1, A2, A3);
impl_provider_fn!(A1, A2, A3, A4);
impl_provider_fn!(A1, A2, A3, A4, A5);
impl_provider_fn!(A1, A2, A3, A4, A5, A6);
impl_provider_fn!(A1, A2, A3, A4, A5, A6, A7);
impl_provider_fn!(A1, A2, A3, A4, A5, A6, A7, A8);
