//! Rental lifecycle service
//!
//! Owns the status state machine: every transition checks who is acting and
//! what state the rental is in, then stamps the transition and notifies the
//! other party.

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        notification::NotificationKind,
        rental::{CreateRental, Rental, RentalDetails, RentalStatus},
    },
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct RentalsService {
    repository: Repository,
    email: EmailService,
}

impl RentalsService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Request to borrow an item for a date window
    pub async fn request(
        &self,
        item_id: i32,
        borrower_id: i32,
        request: CreateRental,
    ) -> AppResult<RentalDetails> {
        let today = Utc::now().date_naive();
        if request.start_date < today {
            return Err(AppError::Validation(
                "Start date must not be in the past".to_string(),
            ));
        }
        if request.end_date < request.start_date {
            return Err(AppError::Validation(
                "End date must not precede start date".to_string(),
            ));
        }

        let rental = self
            .repository
            .rentals
            .create(item_id, borrower_id, &request)
            .await?;

        let details = self.repository.rentals.get_details(rental.id).await?;
        self.repository
            .notifications
            .create(
                details.lender.id,
                rental.id,
                NotificationKind::RentalRequest,
                &format!(
                    "{} wants to borrow '{}' from {} to {}",
                    details.borrower.username,
                    details.item.name,
                    details.start_date,
                    details.end_date
                ),
            )
            .await?;

        tracing::info!(
            rental_id = rental.id,
            item_id,
            borrower_id,
            "Rental requested"
        );

        Ok(details)
    }

    /// Accept a pending request (lender only)
    pub async fn accept(&self, rental_id: i32, actor_id: i32) -> AppResult<RentalDetails> {
        let rental = self.load_for_lender(rental_id, actor_id).await?;
        Self::require_status(&rental, RentalStatus::Pending)?;

        self.repository.rentals.approve(rental_id).await?;
        let details = self.repository.rentals.get_details(rental_id).await?;
        self.repository
            .notifications
            .create(
                details.borrower.id,
                rental_id,
                NotificationKind::RequestApproved,
                &format!(
                    "Your request for '{}' was approved. Pick it up from {} (room {})",
                    details.item.name, details.lender.username, details.lender.room_number
                ),
            )
            .await?;

        Ok(details)
    }

    /// Reject a pending request (lender only)
    pub async fn reject(&self, rental_id: i32, actor_id: i32) -> AppResult<RentalDetails> {
        let rental = self.load_for_lender(rental_id, actor_id).await?;
        Self::require_status(&rental, RentalStatus::Pending)?;

        self.repository.rentals.reject(rental_id).await?;
        let details = self.repository.rentals.get_details(rental_id).await?;
        self.repository
            .notifications
            .create(
                details.borrower.id,
                rental_id,
                NotificationKind::RequestRejected,
                &format!("Your request for '{}' was rejected", details.item.name),
            )
            .await?;

        Ok(details)
    }

    /// Record the hand-over of an approved rental (lender only)
    pub async fn pickup(&self, rental_id: i32, actor_id: i32) -> AppResult<RentalDetails> {
        let rental = self.load_for_lender(rental_id, actor_id).await?;
        Self::require_status(&rental, RentalStatus::Approved)?;

        self.repository.rentals.mark_borrowed(rental_id).await?;
        let details = self.repository.rentals.get_details(rental_id).await?;
        self.repository
            .notifications
            .create(
                details.borrower.id,
                rental_id,
                NotificationKind::ItemBorrowed,
                &format!(
                    "'{}' is now with you. Return it by {}",
                    details.item.name, details.end_date
                ),
            )
            .await?;

        Ok(details)
    }

    /// Record the return of a borrowed rental (lender only)
    pub async fn give_back(&self, rental_id: i32, actor_id: i32) -> AppResult<RentalDetails> {
        let rental = self.load_for_lender(rental_id, actor_id).await?;
        Self::require_status(&rental, RentalStatus::Borrowed)?;

        self.repository.rentals.mark_returned(rental_id).await?;
        let details = self.repository.rentals.get_details(rental_id).await?;
        self.repository
            .notifications
            .create(
                details.borrower.id,
                rental_id,
                NotificationKind::ItemReturned,
                &format!("'{}' was marked as returned. Thanks!", details.item.name),
            )
            .await?;

        Ok(details)
    }

    /// Cancel an own request before pickup (borrower only)
    pub async fn cancel(&self, rental_id: i32, actor_id: i32) -> AppResult<RentalDetails> {
        let rental = self.repository.rentals.get_by_id(rental_id).await?;
        if rental.borrower_id != actor_id {
            return Err(AppError::Authorization(
                "Only the borrower can cancel this request".to_string(),
            ));
        }
        if !rental.status.cancellable() {
            return Err(AppError::BusinessRule(format!(
                "Cannot cancel a rental in status '{}'",
                rental.status
            )));
        }

        self.repository.rentals.cancel(rental_id).await?;
        self.repository.rentals.get_details(rental_id).await
    }

    /// Rentals where the user is the borrower
    pub async fn borrowed_items(&self, user_id: i32) -> AppResult<Vec<RentalDetails>> {
        self.repository.rentals.list_for_borrower(user_id).await
    }

    /// Rentals where the user is the lender
    pub async fn lended_items(&self, user_id: i32) -> AppResult<Vec<RentalDetails>> {
        self.repository.rentals.list_for_lender(user_id).await
    }

    /// Notify borrowers of rentals due back today or overdue.
    ///
    /// At most one reminder per rental per day; borrowers with an email
    /// address also get a mail. Returns the number of reminders sent.
    pub async fn send_return_reminders(&self) -> AppResult<u32> {
        let due = self.repository.rentals.due_for_reminder().await?;
        let mut sent = 0u32;

        for rental in due {
            if self.repository.rentals.reminded_today(rental.id).await? {
                continue;
            }

            let details = self.repository.rentals.get_details(rental.id).await?;
            self.repository
                .notifications
                .create(
                    rental.borrower_id,
                    rental.id,
                    NotificationKind::Reminder,
                    &format!(
                        "Reminder: '{}' is due back on {}",
                        details.item.name, details.end_date
                    ),
                )
                .await?;

            let borrower = self.repository.users.get_by_id(rental.borrower_id).await?;
            if let Some(ref email) = borrower.email {
                if let Err(e) = self
                    .email
                    .send_return_reminder(
                        email,
                        &borrower.username,
                        &details.item.name,
                        details.end_date,
                    )
                    .await
                {
                    // Reminder notification already recorded; mail is best-effort
                    tracing::warn!(rental_id = rental.id, "Failed to send reminder email: {}", e);
                }
            }

            sent += 1;
        }

        Ok(sent)
    }

    async fn load_for_lender(&self, rental_id: i32, actor_id: i32) -> AppResult<Rental> {
        let rental = self.repository.rentals.get_by_id(rental_id).await?;
        if rental.lender_id != actor_id {
            return Err(AppError::Authorization(
                "Only the lender can act on this request".to_string(),
            ));
        }
        Ok(rental)
    }

    fn require_status(rental: &Rental, expected: RentalStatus) -> AppResult<()> {
        if rental.status == expected {
            Ok(())
        } else {
            Err(AppError::BusinessRule(format!(
                "Rental is '{}', expected '{}'",
                rental.status, expected
            )))
        }
    }
}
