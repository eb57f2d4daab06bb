use std::iter;

pub type UserId = i64;

/// The admin plus the users allowed to change the LED. The same set receives
/// broadcasts.
#[derive(Clone, Debug, PartialEq)]
pub struct Operators {
    admin: UserId,
    allowed: Vec<UserId>,
}

impl Operators {
    pub fn new<I: IntoIterator<Item = UserId>>(admin: UserId, allowed: I) -> Self {
        let mut users: Vec<UserId> = Vec::new();

        for user in allowed {
            if user != admin && !users.contains(&user) {
                users.push(user);
            }
        }

        Self {
            admin,
            allowed: users,
        }
    }

    pub fn is_allowed(&self, user: UserId) -> bool {
        user == self.admin || self.allowed.contains(&user)
    }

    /// Admin first, then the other users in configuration order.
    pub fn recipients(&self) -> impl Iterator<Item = UserId> + '_ {
        iter::once(self.admin).chain(self.allowed.iter().copied())
    }
}
