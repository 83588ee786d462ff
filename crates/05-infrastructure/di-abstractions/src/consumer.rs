//! 消费者抽象
//!
//! 消费者是没有返回值的回调，参数全部由容器解析。

use crate::resolver::ComponentResolver;
use infrastructure_common::{Component, DependencyResult};
use std::rc::Rc;

/// 回调消费者
///
/// 为 `FnOnce(Rc<A1>, ..., Rc<An>)` 自动实现。参数按声明顺序解析，
/// 任一解析失败时直接返回错误，不调用回调。
pub trait Consumer<Args> {
    /// 解析参数并调用回调
    fn consume_with<R: ComponentResolver>(self, resolver: &mut R) -> DependencyResult<()>;
}

macro_rules! impl_consumer_fn {
    ($($arg:ident),*) => {
        impl<F, $($arg,)*> Consumer<($($arg,)*)> for F
        where
            F: FnOnce($(Rc<$arg>),*),
            $($arg: Component,)*
        {
            #[allow(non_snake_case, unused_variables)]
            fn consume_with<R: ComponentResolver>(self, resolver: &mut R) -> DependencyResult<()> {
                $(let $arg = resolver.resolve::<$arg>()?;)*
                self($($arg),*);
                Ok(())
            }
        }
    };
}

impl_consumer_fn!();
impl_consumer_fn!(A1);
impl_consumer_fn!(A1, A2);
impl_consumer_fn!(A1, A2, A3);
impl_consumer_fn!(A1, A2, A3, A4);
impl_consumer_fn!(A1, A2, A3, A4, A5);
impl_consumer_fn!(A1, A2, A3, A4, A5, A6);
impl_consumer_fn!(A1, A2, A3, A4, A5, A6, A7);
impl_consumer_fn!(A1, A2, A3, A4, A5, A6, A7, A8);
