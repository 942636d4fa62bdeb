use std::cmp::Reverse;
use std::sync::{Arc, Mutex, MutexGuard};

use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    CustomerQuery, DependOnCustomerQuery, DependOnMovieQuery, DependOnRentalQuery, MovieQuery,
    RentalQuery,
};
use kernel::interface::update::{
    DependOnMovieModifier, DependOnRentalModifier, MovieModifier, RentalModifier,
};
use kernel::prelude::entity::{
    Customer, CustomerId, Movie, MovieId, NumberInStock, Rental, RentalId, SelectLimit,
    SelectOffset,
};
use kernel::KernelError;

#[derive(Debug, Clone, Default)]
pub struct Store {
    pub customers: Vec<Customer>,
    pub movies: Vec<Movie>,
    pub rentals: Vec<Rental>,
    /// Copies handed out by the customer/movie lookup instead of the stored rentals.
    pub stale_rentals: Vec<Rental>,
    pub fail_stock_increment: bool,
    pub fail_take_stock: bool,
    pub fail_rental_create: bool,
}

/// In-memory database shared between clones.
///
/// Each transaction works on its own copy of the store, which replaces the shared
/// store on commit and is discarded on roll back or drop.
#[derive(Debug, Clone, Default)]
pub struct MockDatabase {
    store: Arc<Mutex<Store>>,
}

impl MockDatabase {
    pub fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().expect("store lock poisoned")
    }
}

pub struct MockTransaction {
    shared: Arc<Mutex<Store>>,
    staged: Store,
}

#[async_trait::async_trait]
impl Transaction for MockTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        *self.shared.lock().expect("store lock poisoned") = self.staged;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MockDatabase {
    type Transaction = MockTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let staged = self.store().clone();
        Ok(MockTransaction {
            shared: Arc::clone(&self.store),
            staged,
        })
    }
}

pub struct MockRepository;

#[async_trait::async_trait]
impl CustomerQuery for MockRepository {
    type Transaction = MockTransaction;
    async fn find_by_id(
        &self,
        con: &mut MockTransaction,
        id: &CustomerId,
    ) -> error_stack::Result<Option<Customer>, KernelError> {
        Ok(con
            .staged
            .customers
            .iter()
            .find(|customer| customer.id() == id)
            .cloned())
    }
}

#[async_trait::async_trait]
impl MovieQuery for MockRepository {
    type Transaction = MockTransaction;
    async fn find_by_id(
        &self,
        con: &mut MockTransaction,
        id: &MovieId,
    ) -> error_stack::Result<Option<Movie>, KernelError> {
        Ok(con
            .staged
            .movies
            .iter()
            .find(|movie| movie.id() == id)
            .cloned())
    }
}

#[async_trait::async_trait]
impl MovieModifier for MockRepository {
    type Transaction = MockTransaction;
    async fn increment_stock(
        &self,
        con: &mut MockTransaction,
        movie_id: &MovieId,
        delta: i32,
    ) -> error_stack::Result<(), KernelError> {
        let store = &mut con.staged;
        if store.fail_stock_increment {
            return Err(Report::new(KernelError::Internal).attach_printable("stock is offline"));
        }
        if let Some(movie) = store.movies.iter_mut().find(|movie| movie.id() == movie_id) {
            let stock = *movie.number_in_stock().as_ref() + delta;
            movie.substitute(|movie| *movie.number_in_stock = NumberInStock::new(stock));
        }
        Ok(())
    }

    async fn take_stock(
        &self,
        con: &mut MockTransaction,
        movie_id: &MovieId,
    ) -> error_stack::Result<bool, KernelError> {
        let store = &mut con.staged;
        if store.fail_take_stock {
            return Ok(false);
        }
        let Some(movie) = store.movies.iter_mut().find(|movie| movie.id() == movie_id) else {
            return Ok(false);
        };
        if movie.number_in_stock().is_empty() {
            return Ok(false);
        }
        let stock = *movie.number_in_stock().as_ref() - 1;
        movie.substitute(|movie| *movie.number_in_stock = NumberInStock::new(stock));
        Ok(true)
    }
}

#[async_trait::async_trait]
impl RentalQuery for MockRepository {
    type Transaction = MockTransaction;
    async fn find_by_id(
        &self,
        con: &mut MockTransaction,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        Ok(con
            .staged
            .rentals
            .iter()
            .find(|rental| rental.id() == id)
            .cloned())
    }

    async fn find_by_customer_and_movie(
        &self,
        con: &mut MockTransaction,
        customer_id: &CustomerId,
        movie_id: &MovieId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        let store = &con.staged;
        let rented = |rental: &&Rental| {
            rental.customer().id() == customer_id && rental.movie().id() == movie_id
        };
        if let Some(stale) = store.stale_rentals.iter().find(rented) {
            return Ok(Some(stale.clone()));
        }
        Ok(store
            .rentals
            .iter()
            .filter(rented)
            .min_by_key(|rental| (rental.is_returned(), Reverse(*rental.date_out().as_ref())))
            .cloned())
    }

    async fn find_all(
        &self,
        con: &mut MockTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let mut rentals = con.staged.rentals.clone();
        rentals.sort_by_key(|rental| Reverse(*rental.date_out().as_ref()));
        let offset = usize::try_from(*offset.as_ref()).unwrap_or_default();
        let limit = usize::try_from(*limit.as_ref()).unwrap_or_default();
        Ok(rentals.into_iter().skip(offset).take(limit).collect())
    }
}

#[async_trait::async_trait]
impl RentalModifier for MockRepository {
    type Transaction = MockTransaction;
    async fn create(
        &self,
        con: &mut MockTransaction,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        if con.staged.fail_rental_create {
            return Err(Report::new(KernelError::Internal).attach_printable("rentals are offline"));
        }
        con.staged.rentals.push(rental.clone());
        Ok(())
    }

    async fn mark_returned(
        &self,
        con: &mut MockTransaction,
        rental: &Rental,
    ) -> error_stack::Result<bool, KernelError> {
        let store = &mut con.staged;
        let open = store
            .rentals
            .iter_mut()
            .find(|stored| stored.id() == rental.id() && !stored.is_returned());
        match open {
            Some(stored) => {
                *stored = rental.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl DependOnCustomerQuery for MockDatabase {
    type CustomerQuery = MockRepository;
    fn customer_query(&self) -> &Self::CustomerQuery {
        &MockRepository
    }
}

impl DependOnMovieQuery for MockDatabase {
    type MovieQuery = MockRepository;
    fn movie_query(&self) -> &Self::MovieQuery {
        &MockRepository
    }
}

impl DependOnMovieModifier for MockDatabase {
    type MovieModifier = MockRepository;
    fn movie_modifier(&self) -> &Self::MovieModifier {
        &MockRepository
    }
}

impl DependOnRentalQuery for MockDatabase {
    type RentalQuery = MockRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &MockRepository
    }
}

impl DependOnRentalModifier for MockDatabase {
    type RentalModifier = MockRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &MockRepository
    }
}
