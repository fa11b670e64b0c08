// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! The in-memory store of every resource.
//!
//! One [`Registry`] exists per process. It is built at start-up and handed to
//! each handler; it holds one insertion-ordered [`Collection`] per kind.
//!
//! # Referential integrity
//!
//! [`Registry::remove`] refuses to delete a resource whose
//! [`Dependents`](crate::resources::Dependents) are not empty and leaves the
//! registry untouched when it does. Keeping the dependents in step is up to
//! the handlers, through [`Registry::link`] and [`Registry::unlink`].

use indexmap::IndexMap;

use crate::errors::Ec2Error;
use crate::models::Tag;
use crate::resources::{
    CapacityReservation, InternetGateway, Kind, Resource, RouteTable, Subnet, Vpc,
};

/// Resources of one kind keyed by id, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: IndexMap<String, T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }
}

impl<T: Resource> Collection<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    fn insert(&mut self, resource: T) {
        self.items.insert(resource.id().to_string(), resource);
    }

    fn remove(&mut self, id: &str) -> Option<T> {
        // shift_remove keeps the order the paginator relies on
        self.items.shift_remove(id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    pub(crate) vpcs: Collection<Vpc>,
    pub(crate) subnets: Collection<Subnet>,
    pub(crate) route_tables: Collection<RouteTable>,
    pub(crate) internet_gateways: Collection<InternetGateway>,
    pub(crate) capacity_reservations: Collection<CapacityReservation>,
}

/// A tag together with the resource carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedResource<'a> {
    pub resource_id: &'a str,
    pub kind: Kind,
    pub tag: &'a Tag,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection<T: Resource>(&self) -> &Collection<T> {
        T::collection(self)
    }

    pub fn collection_mut<T: Resource>(&mut self) -> &mut Collection<T> {
        T::collection_mut(self)
    }

    pub fn contains<T: Resource>(&self, id: &str) -> bool {
        self.collection::<T>().contains(id)
    }

    pub fn get<T: Resource>(&self, id: &str) -> Result<&T, Ec2Error> {
        self.collection::<T>()
            .get(id)
            .ok_or_else(|| T::KIND.not_found(id))
    }

    pub fn get_mut<T: Resource>(&mut self, id: &str) -> Result<&mut T, Ec2Error> {
        self.collection_mut::<T>()
            .get_mut(id)
            .ok_or_else(|| T::KIND.not_found(id))
    }

    /// All resources of a kind, in insertion order.
    pub fn list<T: Resource>(&self) -> Vec<&T> {
        self.collection::<T>().iter().collect()
    }

    /// The resources named by `ids` in request order, or all of them when
    /// `ids` is empty. Any unknown id fails the whole lookup.
    pub fn select<T: Resource>(&self, ids: &[String]) -> Result<Vec<&T>, Ec2Error> {
        if ids.is_empty() {
            return Ok(self.list());
        }
        ids.iter().map(|id| self.get::<T>(id)).collect()
    }

    pub fn insert<T: Resource>(&mut self, resource: T) -> String {
        let id = resource.id().to_string();
        tracing::debug!("inserting {} {}", T::KIND, id);
        self.collection_mut::<T>().insert(resource);
        id
    }

    /// Removes a resource that nothing depends on any more.
    pub fn remove<T: Resource>(&mut self, id: &str) -> Result<T, Ec2Error> {
        let resource = self.get::<T>(id)?;
        if let Some((kind, dependent)) = resource.dependents().first() {
            tracing::debug!("{} {} still has {} {}", T::KIND, id, kind, dependent);
            return Err(Ec2Error::DependencyViolation(format!(
                "The {} '{}' has dependencies and cannot be deleted.",
                T::KIND.noun(),
                id
            )));
        }
        tracing::debug!("removing {} {}", T::KIND, id);
        self.collection_mut::<T>()
            .remove(id)
            .ok_or_else(|| T::KIND.not_found(id))
    }

    /// Records `child_id` of `child_kind` as a dependent of parent `parent_id`.
    pub fn link<P: Resource>(
        &mut self,
        parent_id: &str,
        child_kind: Kind,
        child_id: &str,
    ) -> Result<(), Ec2Error> {
        self.get_mut::<P>(parent_id)?
            .dependents_mut()
            .add(child_kind, child_id);
        Ok(())
    }

    /// Drops `child_id` from the parent's dependents. A parent that is already
    /// gone is not an error.
    pub fn unlink<P: Resource>(&mut self, parent_id: &str, child_kind: Kind, child_id: &str) {
        if let Some(parent) = self.collection_mut::<P>().get_mut(parent_id) {
            parent.dependents_mut().remove(child_kind, child_id);
        }
    }

    /// Kind of the resource with this id, looked up across every collection.
    pub fn kind_of(&self, id: &str) -> Option<Kind> {
        if self.vpcs.contains(id) {
            Some(Kind::Vpc)
        } else if self.subnets.contains(id) {
            Some(Kind::Subnet)
        } else if self.route_tables.contains(id) {
            Some(Kind::RouteTable)
        } else if self.internet_gateways.contains(id) {
            Some(Kind::InternetGateway)
        } else if self.capacity_reservations.contains(id) {
            Some(Kind::CapacityReservation)
        } else {
            None
        }
    }

    /// The tag list of any taggable resource.
    pub fn tags_mut(&mut self, id: &str) -> Result<&mut Vec<Tag>, Ec2Error> {
        let tags = match self.kind_of(id) {
            Some(Kind::Vpc) => self.vpcs.get_mut(id).map(Resource::tags_mut),
            Some(Kind::Subnet) => self.subnets.get_mut(id).map(Resource::tags_mut),
            Some(Kind::RouteTable) => self.route_tables.get_mut(id).map(Resource::tags_mut),
            Some(Kind::InternetGateway) => {
                self.internet_gateways.get_mut(id).map(Resource::tags_mut)
            }
            Some(Kind::CapacityReservation) => {
                self.capacity_reservations.get_mut(id).map(Resource::tags_mut)
            }
            Some(Kind::RouteTableAssociation) | None => None,
        };
        tags.ok_or_else(|| Ec2Error::other("InvalidID", format!("The ID '{id}' is not valid")))
    }

    /// Every tag in the registry, by kind, then resource, then tag order.
    pub fn tagged(&self) -> Vec<TaggedResource<'_>> {
        fn collect<'a, T: Resource>(
            collection: &'a Collection<T>,
            out: &mut Vec<TaggedResource<'a>>,
        ) {
            for resource in collection.iter() {
                out.extend(resource.tags().iter().map(|tag| TaggedResource {
                    resource_id: resource.id(),
                    kind: T::KIND,
                    tag,
                }));
            }
        }

        let mut out = Vec::new();
        collect(&self.vpcs, &mut out);
        collect(&self.subnets, &mut out);
        collect(&self.route_tables, &mut out);
        collect(&self.internet_gateways, &mut out);
        collect(&self.capacity_reservations, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Ipv4Cidr;

    fn vpc(id: &str) -> Vpc {
        Vpc::new(id, "10.0.0.0/16".parse::<Ipv4Cidr>().unwrap(), "123456789012")
    }

    fn subnet(id: &str, vpc_id: &str) -> Subnet {
        Subnet::new(
            id,
            vpc_id,
            "10.0.1.0/24".parse::<Ipv4Cidr>().unwrap(),
            "us-east-1a",
            "123456789012",
        )
    }

    #[test]
    fn test_insert_get_remove() {
        let mut registry = Registry::new();
        registry.insert(vpc("vpc-1"));

        assert_eq!(registry.get::<Vpc>("vpc-1").unwrap().id(), "vpc-1");
        assert_eq!(registry.collection::<Vpc>().len(), 1);

        let removed = registry.remove::<Vpc>("vpc-1").unwrap();
        assert_eq!(removed.id(), "vpc-1");
        assert!(registry.collection::<Vpc>().is_empty());
    }

    #[test]
    fn test_get_unknown_id() {
        let registry = Registry::new();
        let err = registry.get::<Vpc>("vpc-404").unwrap_err();
        assert_eq!(err.code(), "InvalidVpcID.NotFound");
        assert_eq!(err.to_string(), "The vpc ID 'vpc-404' does not exist");
    }

    #[test]
    fn test_dependency_blocks_delete_without_mutation() {
        let mut registry = Registry::new();
        registry.insert(vpc("x-1"));
        registry.insert(subnet("y-1", "x-1"));
        registry.link::<Vpc>("x-1", Kind::Subnet, "y-1").unwrap();

        let snapshot = registry.clone();
        let err = registry.remove::<Vpc>("x-1").unwrap_err();
        assert_eq!(err.code(), "DependencyViolation");
        assert_eq!(registry, snapshot);

        registry.remove::<Subnet>("y-1").unwrap();
        registry.unlink::<Vpc>("x-1", Kind::Subnet, "y-1");
        registry.remove::<Vpc>("x-1").unwrap();

        assert!(registry.collection::<Vpc>().is_empty());
        assert!(registry.collection::<Subnet>().is_empty());
    }

    #[test]
    fn test_removal_keeps_order() {
        let mut registry = Registry::new();
        for id in ["vpc-a", "vpc-b", "vpc-c", "vpc-d"] {
            registry.insert(vpc(id));
        }
        registry.remove::<Vpc>("vpc-b").unwrap();
        let ids: Vec<&str> = registry.collection::<Vpc>().ids().collect();
        assert_eq!(ids, vec!["vpc-a", "vpc-c", "vpc-d"]);
    }

    #[test]
    fn test_select() {
        let mut registry = Registry::new();
        registry.insert(vpc("vpc-a"));
        registry.insert(vpc("vpc-b"));

        let all = registry.select::<Vpc>(&[]).unwrap();
        assert_eq!(all.len(), 2);

        let picked = registry.select::<Vpc>(&["vpc-b".to_string()]).unwrap();
        assert_eq!(picked[0].id(), "vpc-b");

        let err = registry
            .select::<Vpc>(&["vpc-a".to_string(), "vpc-z".to_string()])
            .unwrap_err();
        assert_eq!(err.code(), "InvalidVpcID.NotFound");
    }

    #[test]
    fn test_link_to_missing_parent() {
        let mut registry = Registry::new();
        let err = registry.link::<Vpc>("vpc-404", Kind::Subnet, "subnet-1").unwrap_err();
        assert_eq!(err.code(), "InvalidVpcID.NotFound");
    }

    #[test]
    fn test_tags_across_kinds() {
        let mut registry = Registry::new();
        registry.insert(vpc("vpc-1"));
        registry.insert(subnet("subnet-1", "vpc-1"));

        registry.tags_mut("subnet-1").unwrap().push(Tag::new("Name", "a"));
        registry.tags_mut("vpc-1").unwrap().push(Tag::new("Name", "b"));

        let tagged = registry.tagged();
        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[0].resource_id, "vpc-1");
        assert_eq!(tagged[0].kind, Kind::Vpc);
        assert_eq!(tagged[1].resource_id, "subnet-1");

        let err = registry.tags_mut("i-unknown").unwrap_err();
        assert_eq!(err.code(), "InvalidID");
    }
}
