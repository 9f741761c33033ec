//! Order service
//!
//! Order creation and settlement. Green-token orders settle immediately:
//! the guarded wallet debit runs first, so a buyer can never overspend;
//! an order whose debit fails is cancelled on the spot. Stripe orders stay
//! pending until the verified webhook settles them.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::{
    order_total_cents, order_total_green, NewLedgerEntry, NewOrder, NewOrderItem,
    NewStripePayment, NewTree, Order, OrderId, OrderItem, OrderStatus, PaymentMethod, ProductId,
    ProjectId, Role, StripePayment, TxKind, User,
};
use crate::domain::ports::{
    OrderRepository, PaymentRepository, ProductRepository, ProjectRepository, TreeRepository,
    WalletRepository,
};
use crate::error::{AppError, DomainError};

const MAX_LINE_QUANTITY: i32 = 100;

/// One requested order line
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// A created order with its items
#[derive(Debug, Clone)]
pub struct OrderOutcome {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub trees_planted: usize,
}

/// Result of processing a Stripe webhook event
#[derive(Debug, Clone)]
pub enum StripeEventResult {
    /// Payment recorded and order settled
    Processed(StripePayment),
    /// Event id seen before; nothing changed
    Duplicate,
}

/// Service for orders and their settlement
pub struct OrderService<OR, PDR, JR, TR, WR, PayR>
where
    OR: OrderRepository,
    PDR: ProductRepository,
    JR: ProjectRepository,
    TR: TreeRepository,
    WR: WalletRepository,
    PayR: PaymentRepository,
{
    orders: Arc<OR>,
    products: Arc<PDR>,
    projects: Arc<JR>,
    trees: Arc<TR>,
    wallets: Arc<WR>,
    payments: Arc<PayR>,
}

impl<OR, PDR, JR, TR, WR, PayR> OrderService<OR, PDR, JR, TR, WR, PayR>
where
    OR: OrderRepository,
    PDR: ProductRepository,
    JR: ProjectRepository,
    TR: TreeRepository,
    WR: WalletRepository,
    PayR: PaymentRepository,
{
    pub fn new(
        orders: Arc<OR>,
        products: Arc<PDR>,
        projects: Arc<JR>,
        trees: Arc<TR>,
        wallets: Arc<WR>,
        payments: Arc<PayR>,
    ) -> Self {
        Self {
            orders,
            products,
            projects,
            trees,
            wallets,
            payments,
        }
    }

    /// Create an order; green-token orders settle immediately
    pub async fn create_order(
        &self,
        buyer: &User,
        project_id: &ProjectId,
        lines: &[OrderLine],
        payment_method: PaymentMethod,
    ) -> Result<OrderOutcome, AppError> {
        if lines.is_empty() {
            return Err(AppError::BadRequest("Order has no items".to_string()));
        }

        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| {
                AppError::Domain(DomainError::NotFound(format!("project {}", project_id)))
            })?;
        if !project.accepts_trees() {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "project '{}' is not accepting orders",
                project.name
            ))));
        }

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            if line.quantity < 1 || line.quantity > MAX_LINE_QUANTITY {
                return Err(AppError::BadRequest(format!(
                    "Quantity must be between 1 and {}",
                    MAX_LINE_QUANTITY
                )));
            }

            let product = self
                .products
                .find_by_id(&line.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::Domain(DomainError::NotFound(format!(
                        "product {}",
                        line.product_id
                    )))
                })?;
            if !product.active {
                return Err(AppError::Domain(DomainError::Conflict(format!(
                    "product '{}' is not available",
                    product.name
                ))));
            }
            if payment_method == PaymentMethod::GreenTokens && !product.purchasable_with_green() {
                return Err(AppError::BadRequest(format!(
                    "Product '{}' cannot be paid with green tokens",
                    product.name
                )));
            }

            items.push(NewOrderItem {
                product_id: product.id,
                quantity: line.quantity,
                unit_price_cents: product.price_cents,
                unit_price_green: product.price_green,
                unit_green_reward: product.green_reward,
            });
        }

        let new_order = NewOrder {
            buyer_id: buyer.id,
            project_id: *project_id,
            payment_method,
            total_cents: order_total_cents(&items),
            items,
        };

        let order = self.orders.create(&new_order).await?;

        match payment_method {
            PaymentMethod::GreenTokens => self.settle_with_green(order, &new_order.items).await,
            PaymentMethod::Stripe => {
                let items = self.orders.find_items(&order.id).await?;
                Ok(OrderOutcome {
                    order,
                    items,
                    trees_planted: 0,
                })
            }
        }
    }

    /// Debit the buyer and settle. A failed debit cancels the order.
    async fn settle_with_green(
        &self,
        order: Order,
        items: &[NewOrderItem],
    ) -> Result<OrderOutcome, AppError> {
        let wallet = self
            .wallets
            .find_by_user(&order.buyer_id)
            .await?
            .ok_or_else(|| {
                AppError::Domain(DomainError::NotFound(format!(
                    "wallet of user {}",
                    order.buyer_id
                )))
            })?;

        let total_green = order_total_green(items);
        let debit = NewLedgerEntry {
            wallet_id: wallet.id,
            kind: TxKind::Debit,
            amount: total_green,
            reason: "order payment".to_string(),
            reference_id: Some(order.id.0),
        };

        if let Err(err) = self.wallets.apply_green(&debit).await {
            self.orders.mark_cancelled(&order.id).await?;
            return Err(err.into());
        }

        // Token orders earn no reward; only cash purchases do
        self.settle(&order, false).await
    }

    /// Mark paid, plant the order's trees, and optionally credit rewards
    async fn settle(&self, order: &Order, credit_reward: bool) -> Result<OrderOutcome, AppError> {
        let now = Utc::now();
        self.orders.mark_paid(&order.id, now).await?;

        let items = self.orders.find_items(&order.id).await?;

        let mut new_trees = Vec::new();
        for item in &items {
            let product = self
                .products
                .find_by_id(&item.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::Domain(DomainError::Internal(format!(
                        "order {} references missing product {}",
                        order.id, item.product_id
                    )))
                })?;

            if let Some(species_id) = product.species_id {
                let count = product.trees_per_unit as i64 * item.quantity as i64;
                for _ in 0..count {
                    new_trees.push(NewTree {
                        species_id,
                        project_id: order.project_id,
                        owner_id: order.buyer_id,
                    });
                }
            }
        }

        let planted = self.trees.create_many(&new_trees).await?;

        if credit_reward {
            let reward: i64 = items.iter().map(|i| i.line_green_reward()).sum();
            if reward > 0 {
                let wallet = self
                    .wallets
                    .find_by_user(&order.buyer_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Domain(DomainError::NotFound(format!(
                            "wallet of user {}",
                            order.buyer_id
                        )))
                    })?;

                self.wallets
                    .apply_green(&NewLedgerEntry {
                        wallet_id: wallet.id,
                        kind: TxKind::Credit,
                        amount: reward,
                        reason: "purchase reward".to_string(),
                        reference_id: Some(order.id.0),
                    })
                    .await?;
            }
        }

        let order = self
            .orders
            .find_by_id(&order.id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("order {} vanished", order.id)))?;

        tracing::info!(order = %order.id, trees = planted.len(), "Order settled");

        Ok(OrderOutcome {
            order,
            items,
            trees_planted: planted.len(),
        })
    }

    /// Process a verified `checkout.session.completed` event.
    ///
    /// Idempotent on the Stripe event id: redeliveries are acknowledged
    /// without changing anything.
    pub async fn process_stripe_event(
        &self,
        event_id: &str,
        order_id: &OrderId,
        amount_cents: i64,
    ) -> Result<StripeEventResult, AppError> {
        if self.payments.find_by_event_id(event_id).await?.is_some() {
            tracing::debug!(event_id, "Stripe event already processed");
            return Ok(StripeEventResult::Duplicate);
        }

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| {
                AppError::Domain(DomainError::NotFound(format!("order {}", order_id)))
            })?;

        if order.status != OrderStatus::Pending {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "order {} is {}, not pending",
                order.id, order.status
            ))));
        }
        if order.total_cents != amount_cents {
            return Err(AppError::BadRequest(format!(
                "Payment amount {} does not match order total {}",
                amount_cents, order.total_cents
            )));
        }

        let payment = self
            .payments
            .create(&NewStripePayment {
                stripe_event_id: event_id.to_string(),
                order_id: order.id,
                amount_cents,
            })
            .await?;

        self.settle(&order, true).await?;

        Ok(StripeEventResult::Processed(payment))
    }

    /// An order with its items, visible to its buyer and admins
    pub async fn get_order(
        &self,
        actor: &User,
        order_id: &OrderId,
    ) -> Result<(Order, Vec<OrderItem>), AppError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| {
                AppError::Domain(DomainError::NotFound(format!("order {}", order_id)))
            })?;

        if order.buyer_id != actor.id && actor.role != Role::Admin {
            return Err(AppError::Forbidden);
        }

        let items = self.orders.find_items(order_id).await?;
        Ok((order, items))
    }

    /// Orders placed by the actor, newest first
    pub async fn my_orders(&self, actor: &User) -> Result<Vec<Order>, AppError> {
        Ok(self.orders.find_by_buyer(&actor.id).await?)
    }

    /// Cancel a pending order
    pub async fn cancel_order(&self, actor: &User, order_id: &OrderId) -> Result<Order, AppError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| {
                AppError::Domain(DomainError::NotFound(format!("order {}", order_id)))
            })?;

        if order.buyer_id != actor.id && actor.role != Role::Admin {
            return Err(AppError::Forbidden);
        }
        if !order.status.can_cancel() {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "order {} is {}, only pending orders cancel",
                order.id, order.status
            ))));
        }

        self.orders.mark_cancelled(order_id).await?;

        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("order {} vanished", order_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TreeStatus;
    use crate::test_utils::{
        test_product_for_species, test_project, test_species, test_user,
        InMemoryOrderRepository, InMemoryPaymentRepository, InMemoryProductRepository,
        InMemoryProjectRepository, InMemoryTreeRepository, InMemoryWalletRepository,
    };

    struct Fixture {
        service: OrderService<
            InMemoryOrderRepository,
            InMemoryProductRepository,
            InMemoryProjectRepository,
            InMemoryTreeRepository,
            InMemoryWalletRepository,
            InMemoryPaymentRepository,
        >,
        buyer: User,
        project_id: ProjectId,
        product_id: ProductId,
    }

    /// Buyer with a funded wallet, one active project, and one tree product
    /// (1500 cents / 150 green, reward 30, plants 1 tree per unit).
    async fn fixture(green_balance: i64) -> Fixture {
        let buyer = test_user();
        let species = test_species();
        let project = test_project();
        let product = test_product_for_species(species.id);

        let wallets = Arc::new(InMemoryWalletRepository::new());
        let wallet = wallets.create(&buyer.id).await.unwrap();
        if green_balance > 0 {
            wallets
                .apply_green(&NewLedgerEntry {
                    wallet_id: wallet.id,
                    kind: TxKind::Credit,
                    amount: green_balance,
                    reason: "seed balance".to_string(),
                    reference_id: None,
                })
                .await
                .unwrap();
        }

        let service = OrderService::new(
            Arc::new(InMemoryOrderRepository::new()),
            Arc::new(InMemoryProductRepository::new().with_product(product.clone())),
            Arc::new(InMemoryProjectRepository::new().with_project(project.clone())),
            Arc::new(InMemoryTreeRepository::new()),
            wallets,
            Arc::new(InMemoryPaymentRepository::new()),
        );

        Fixture {
            service,
            buyer,
            project_id: project.id,
            product_id: product.id,
        }
    }

    fn line(product_id: ProductId, quantity: i32) -> Vec<OrderLine> {
        vec![OrderLine {
            product_id,
            quantity,
        }]
    }

    #[tokio::test]
    async fn green_order_settles_immediately_and_plants_trees() {
        let f = fixture(500).await;

        let outcome = f
            .service
            .create_order(
                &f.buyer,
                &f.project_id,
                &line(f.product_id, 2),
                PaymentMethod::GreenTokens,
            )
            .await
            .unwrap();

        assert_eq!(outcome.order.status, OrderStatus::Paid);
        assert_eq!(outcome.trees_planted, 2);

        // 2 × 150 green debited, no purchase reward on token orders
        let wallet = f.service.wallets.find_by_user(&f.buyer.id).await.unwrap().unwrap();
        assert_eq!(wallet.green_balance, 200);

        let trees = f.service.trees.find_by_owner(&f.buyer.id).await.unwrap();
        assert_eq!(trees.len(), 2);
        assert!(trees.iter().all(|t| t.status == TreeStatus::Planted));
    }

    #[tokio::test]
    async fn green_order_with_insufficient_balance_is_cancelled() {
        let f = fixture(100).await;

        let result = f
            .service
            .create_order(
                &f.buyer,
                &f.project_id,
                &line(f.product_id, 1),
                PaymentMethod::GreenTokens,
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::InsufficientBalance(_)))
        ));

        // Balance untouched, order cancelled, no trees
        let wallet = f.service.wallets.find_by_user(&f.buyer.id).await.unwrap().unwrap();
        assert_eq!(wallet.green_balance, 100);

        let orders = f.service.my_orders(&f.buyer).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::Cancelled);
        assert!(f.service.trees.find_by_owner(&f.buyer.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stripe_order_stays_pending_until_webhook() {
        let f = fixture(0).await;

        let outcome = f
            .service
            .create_order(
                &f.buyer,
                &f.project_id,
                &line(f.product_id, 1),
                PaymentMethod::Stripe,
            )
            .await
            .unwrap();

        assert_eq!(outcome.order.status, OrderStatus::Pending);
        assert_eq!(outcome.trees_planted, 0);

        let result = f
            .service
            .process_stripe_event("evt_1", &outcome.order.id, 1500)
            .await
            .unwrap();
        assert!(matches!(result, StripeEventResult::Processed(_)));

        // Settled: tree planted and reward credited
        let (order, _) = f.service.get_order(&f.buyer, &outcome.order.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(f.service.trees.find_by_owner(&f.buyer.id).await.unwrap().len(), 1);

        let wallet = f.service.wallets.find_by_user(&f.buyer.id).await.unwrap().unwrap();
        assert_eq!(wallet.green_balance, 30);
    }

    #[tokio::test]
    async fn stripe_event_is_idempotent_on_event_id() {
        let f = fixture(0).await;
        let outcome = f
            .service
            .create_order(
                &f.buyer,
                &f.project_id,
                &line(f.product_id, 1),
                PaymentMethod::Stripe,
            )
            .await
            .unwrap();

        f.service
            .process_stripe_event("evt_1", &outcome.order.id, 1500)
            .await
            .unwrap();
        let second = f
            .service
            .process_stripe_event("evt_1", &outcome.order.id, 1500)
            .await
            .unwrap();

        assert!(matches!(second, StripeEventResult::Duplicate));

        // Reward credited exactly once
        let wallet = f.service.wallets.find_by_user(&f.buyer.id).await.unwrap().unwrap();
        assert_eq!(wallet.green_balance, 30);
        assert_eq!(f.service.trees.find_by_owner(&f.buyer.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stripe_event_rejects_amount_mismatch() {
        let f = fixture(0).await;
        let outcome = f
            .service
            .create_order(
                &f.buyer,
                &f.project_id,
                &line(f.product_id, 1),
                PaymentMethod::Stripe,
            )
            .await
            .unwrap();

        let result = f
            .service
            .process_stripe_event("evt_1", &outcome.order.id, 999)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn cancel_only_while_pending() {
        let f = fixture(500).await;
        let pending = f
            .service
            .create_order(
                &f.buyer,
                &f.project_id,
                &line(f.product_id, 1),
                PaymentMethod::Stripe,
            )
            .await
            .unwrap();

        let cancelled = f.service.cancel_order(&f.buyer, &pending.order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let paid = f
            .service
            .create_order(
                &f.buyer,
                &f.project_id,
                &line(f.product_id, 1),
                PaymentMethod::GreenTokens,
            )
            .await
            .unwrap();

        assert!(f.service.cancel_order(&f.buyer, &paid.order.id).await.is_err());
    }

    #[tokio::test]
    async fn other_users_cannot_read_an_order() {
        let f = fixture(500).await;
        let outcome = f
            .service
            .create_order(
                &f.buyer,
                &f.project_id,
                &line(f.product_id, 1),
                PaymentMethod::Stripe,
            )
            .await
            .unwrap();

        let stranger = test_user();
        let result = f.service.get_order(&stranger, &outcome.order.id).await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn empty_orders_are_rejected() {
        let f = fixture(0).await;

        let result = f
            .service
            .create_order(&f.buyer, &f.project_id, &[], PaymentMethod::Stripe)
            .await;

        assert!(result.is_err());
    }
}
