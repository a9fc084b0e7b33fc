//! Query scopes: which tables a condition or relation may refer to.
//!
//! A plain model is a scope containing itself. `Joined<S, N>` extends scope
//! `S` with model `N`. [`InScope`] proves at compile time that a column's
//! model belongs to a scope; the index parameter (`Here` / `There<_>`)
//! locates it and is always inferred.

use std::marker::PhantomData;

use crate::model::Model;

/// A set of tables rooted at one model.
pub trait Scope: 'static {
    /// The model whose table appears in `FROM`
    type Root: Model;
}

/// Scope `S` joined with model `N`.
pub struct Joined<S, N>(PhantomData<fn() -> (S, N)>);

impl<S: Scope, N: Model> Scope for Joined<S, N> {
    type Root = S::Root;
}

/// Index marker: the model is the newest member of the scope.
pub struct Here;

/// Index marker: the model is further back, at `I`.
pub struct There<I>(PhantomData<I>);

/// Proof that `M` is part of this scope.
#[diagnostic::on_unimplemented(
    message = "columns of `{M}` cannot be used in a query over `{Self}`",
    label = "`{M}` is not part of this query",
    note = "join `{M}` into the relation first"
)]
pub trait InScope<M: Model, I>: Scope {}

impl<S: Scope, N: Model> InScope<N, Here> for Joined<S, N> {}

impl<S, N, M, I> InScope<M, There<I>> for Joined<S, N>
where
    S: InScope<M, I>,
    N: Model,
    M: Model,
{
}
